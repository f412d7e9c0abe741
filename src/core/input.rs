//! Loads the ticker/weight table the allocation is driven by.

use crate::core::allocation::{AllocationRequest, TICKER_HEADER, WEIGHT_HEADER};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("CSV file not found: {}. Please check the file path.", .0.display())]
    NotFound(PathBuf),
    #[error("Missing required column '{0}' in the CSV file")]
    MissingColumn(String),
    #[error("Could not parse the CSV file: {0}")]
    Parse(#[from] csv::Error),
    #[error("Could not read the CSV file: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Weightage")]
    weight: f64,
}

/// Reads allocation requests from a CSV file, in file order.
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<AllocationRequest>, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Io(e),
    })?;
    let requests = read_requests(file)?;
    debug!(
        "Loaded {} allocation requests from {}",
        requests.len(),
        path.display()
    );
    Ok(requests)
}

/// Reads allocation requests from any CSV source with `Ticker` and `Weightage` headers.
pub fn read_requests<R: Read>(reader: R) -> Result<Vec<AllocationRequest>, InputError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?;
    for column in [TICKER_HEADER, WEIGHT_HEADER] {
        if !headers.iter().any(|h| h == column) {
            return Err(InputError::MissingColumn(column.to_string()));
        }
    }

    let mut requests = Vec::new();
    for result in rdr.deserialize() {
        let row: InputRow = result?;
        requests.push(AllocationRequest::new(&row.ticker, row.weight));
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_rows_in_file_order() {
        let csv = "Ticker,Weightage\nRELIANCE,0.6\nTCS.NS,0.4\n";
        let requests = read_requests(csv.as_bytes()).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].ticker, "RELIANCE");
        assert_eq!(requests[0].weight, 0.6);
        assert_eq!(requests[1].ticker, "TCS.NS");
        assert_eq!(requests[1].weight, 0.4);
    }

    #[test]
    fn test_extra_columns_and_whitespace_are_tolerated() {
        let csv = "Name, Ticker , Weightage\nReliance Industries, RELIANCE , 0.25\n";
        let requests = read_requests(csv.as_bytes()).unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].ticker, "RELIANCE");
        assert_eq!(requests[0].weight, 0.25);
    }

    #[test]
    fn test_weights_are_not_validated() {
        let csv = "Ticker,Weightage\nA,0.9\nB,0.9\n";
        let requests = read_requests(csv.as_bytes()).unwrap();
        assert_eq!(requests.iter().map(|r| r.weight).sum::<f64>(), 1.8);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "Ticker,Weight\nA,0.5\n";
        let err = read_requests(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn(ref c) if c == "Weightage"));
        assert_eq!(
            err.to_string(),
            "Missing required column 'Weightage' in the CSV file"
        );
    }

    #[test]
    fn test_non_numeric_weight_is_a_parse_error() {
        let csv = "Ticker,Weightage\nA,half\n";
        let err = read_requests(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Stocks.csv");

        let err = load_requests(&path).unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
        assert!(err.to_string().contains("Please check the file path"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Stocks.csv");
        fs::write(&path, "Ticker,Weightage\nINFY,1.0\n").unwrap();

        let requests = load_requests(&path).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].ticker, "INFY");
    }
}
