use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stockalloc::cli::allocate::AllocateOptions;
use stockalloc::cli::prompt::PresetInputs;
use stockalloc::cli::{BANNER, error_message, exit_status, setup, ui};
use stockalloc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Default)]
struct AllocateArgs {
    /// First day of the range (YYYY-MM-DD); prompted for when omitted
    #[arg(long)]
    start: Option<String>,

    /// Last day of the range (YYYY-MM-DD); prompted for when omitted
    #[arg(long)]
    end: Option<String>,

    /// Total amount to invest; prompted for when omitted
    #[arg(long)]
    investment: Option<String>,

    /// CSV with Ticker and Weightage columns (overrides config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Destination spreadsheet, .xlsx or .csv (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl From<AllocateArgs> for AllocateOptions {
    fn from(args: AllocateArgs) -> AllocateOptions {
        AllocateOptions {
            inputs: PresetInputs {
                start_date: args.start,
                end_date: args.end,
                total_investment: args.investment,
            },
            input_path: args.input,
            output_path: args.output,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Allocate the investment and write the shares table (default)
    Allocate(AllocateArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup::setup(),
        Some(Commands::Allocate(args)) => allocate(args, cli.config_path.as_deref()).await,
        None => allocate(AllocateArgs::default(), cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
        println!(
            "{}",
            ui::style_text(&error_message(e), ui::StyleType::Error)
        );
    }
    ExitCode::from(exit_status(&result))
}

async fn allocate(args: AllocateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    println!("{}", ui::style_text(BANNER, ui::StyleType::Title));
    stockalloc::run_command(stockalloc::AppCommand::Allocate(args.into()), config_path).await
}
