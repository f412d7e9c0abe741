use super::prompt::{PresetInputs, collect_inputs};
use super::ui;
use crate::core::allocation::{self, AllocationEvent, AllocationPlan, ResultTable};
use crate::core::config::AppConfig;
use crate::core::input;
use crate::core::price::HistoryProvider;
use crate::core::spreadsheet;
use crate::core::validation::{self, RawInputs};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// Command-line overrides for one allocation run.
#[derive(Debug, Clone, Default)]
pub struct AllocateOptions {
    pub inputs: PresetInputs,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct AllocationReport {
    pub table: ResultTable,
    pub skipped: Vec<String>,
    pub output_path: PathBuf,
    pub saved: bool,
}

/// Prompts for any missing inputs on the console, then runs the allocation.
pub async fn run(
    config: &AppConfig,
    options: AllocateOptions,
    provider: &(dyn HistoryProvider + Send + Sync),
    today: NaiveDate,
) -> Result<AllocationReport> {
    let AllocateOptions {
        inputs,
        input_path,
        output_path,
    } = options;

    let raw = if inputs.is_complete() {
        collect_inputs(&mut io::empty(), &mut io::sink(), inputs)
    } else {
        let stdin = io::stdin();
        let stdout = io::stdout();
        collect_inputs(&mut stdin.lock(), &mut stdout.lock(), inputs)
    }
    .context("Failed to read input from the console")?;

    let input_path = input_path.unwrap_or_else(|| PathBuf::from(&config.input_path));
    let output_path = output_path.unwrap_or_else(|| PathBuf::from(&config.output_path));
    run_with_inputs(config, &raw, input_path, output_path, provider, today).await
}

/// Validates `raw`, allocates every row of the input file and writes the result table.
///
/// Validation failures are returned as errors before any fetch. An unreadable input file is
/// reported and ends the run without fetching or writing anything. Fetch failures skip the
/// ticker, and a write failure is reported without failing the run.
pub async fn run_with_inputs(
    config: &AppConfig,
    raw: &RawInputs,
    input_path: PathBuf,
    output_path: PathBuf,
    provider: &(dyn HistoryProvider + Send + Sync),
    today: NaiveDate,
) -> Result<AllocationReport> {
    let inputs = validation::validate(raw, today)?;
    debug!(?inputs, "Validated inputs");

    let requests = match input::load_requests(&input_path) {
        Ok(requests) => requests,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load allocation requests");
            println!(
                "{}",
                ui::style_text(&format!("Error: {e}"), ui::StyleType::Error)
            );
            return Ok(AllocationReport {
                table: ResultTable::new(),
                skipped: Vec::new(),
                output_path,
                saved: false,
            });
        }
    };
    info!(
        "Allocating {} across {} tickers for {}",
        inputs.total_investment,
        requests.len(),
        inputs.range
    );

    let plan = AllocationPlan {
        range: inputs.range,
        total_investment: inputs.total_investment,
        exchange_suffix: config.exchange_suffix.clone(),
    };

    let pb = ui::new_progress_bar(requests.len() as u64);
    let mut skipped = Vec::new();
    let table = {
        let pb = pb.clone();
        let skipped = &mut skipped;
        allocation::allocate(provider, &requests, &plan, &mut move |event| match event {
            AllocationEvent::Fetching { ticker } => {
                pb.set_message(format!("Fetching {ticker}"));
            }
            AllocationEvent::Allocated { .. } => pb.inc(1),
            AllocationEvent::Skipped { ticker, error } => {
                pb.suspend(|| {
                    println!(
                        "{}",
                        ui::style_text(
                            &format!("Could not fetch data for {ticker}. Error: {error:#}"),
                            ui::StyleType::Error
                        )
                    )
                });
                skipped.push(ticker.to_string());
                pb.inc(1);
            }
        })
        .await
    };
    pb.finish_and_clear();

    if !table.is_empty() {
        display_summary_table(&table, inputs.total_investment);
    }

    let saved = match spreadsheet::write_table(&table, &output_path) {
        Ok(()) => {
            println!(
                "{}",
                ui::style_text(
                    &format!("Results saved to {}", output_path.display()),
                    ui::StyleType::Success
                )
            );
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to write results");
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            false
        }
    };

    Ok(AllocationReport {
        table,
        skipped,
        output_path,
        saved,
    })
}

fn display_summary_table(table: &ResultTable, total_investment: f64) {
    let mut summary = ui::new_styled_table();
    summary.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Weightage"),
        ui::header_cell("Allocation"),
        ui::header_cell("Trading Days"),
        ui::header_cell("Min Shares"),
        ui::header_cell("Max Shares"),
    ]);

    for row in table.rows() {
        let min = row.shares.values().copied().reduce(f64::min);
        let max = row.shares.values().copied().reduce(f64::max);
        summary.add_row(vec![
            comfy_table::Cell::new(&row.ticker),
            ui::number_cell(format!("{:.4}", row.weight)),
            ui::number_cell(format!("{:.2}", row.allocation(total_investment))),
            ui::number_cell(row.shares.len().to_string()),
            ui::format_optional_cell(min, |v| format!("{v:.3}")),
            ui::format_optional_cell(max, |v| format!("{v:.3}")),
        ]);
    }

    println!(
        "\n{}\n",
        ui::style_text("Allocation Summary", ui::StyleType::Title)
    );
    println!("{summary}");
    println!(
        "{}",
        ui::style_text(
            &format!(
                "{} tickers, {} trading days",
                table.len(),
                table.date_columns().len()
            ),
            ui::StyleType::Subtle
        )
    );
    ui::print_separator();
}
