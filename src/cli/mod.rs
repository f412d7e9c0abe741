pub mod allocate;
pub mod prompt;
pub mod setup;
pub mod ui;

use crate::core::validation::ValidationError;

pub const BANNER: &str = "********** Stocks Allocationyzer **********";

/// Console text for an error that ends the run.
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ValidationError>() {
        // these already carry their "Error: " prefix
        Some(validation) => validation.to_string(),
        None => format!("Error: {err:#}"),
    }
}

/// Process exit status for a finished command: 0 on success, 1 on failure.
pub fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
