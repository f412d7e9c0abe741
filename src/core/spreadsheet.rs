//! Persists a [`ResultTable`] as a spreadsheet: header row, one row per ticker, no index column.
use crate::core::allocation::ResultTable;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Error saving results to {}: {source}", path.display())]
    Xlsx { path: PathBuf, source: XlsxError },
    #[error("Error saving results to {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Error saving results to {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// `.csv` paths get CSV, everything else an xlsx workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Xlsx,
        }
    }
}

pub fn write_table<P: AsRef<Path>>(table: &ResultTable, path: P) -> Result<(), WriteError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path);
    debug!(
        rows = table.len(),
        ?format,
        "Writing results to {}",
        path.display()
    );
    match format {
        OutputFormat::Xlsx => write_xlsx(table, path).map_err(|source| WriteError::Xlsx {
            path: path.to_path_buf(),
            source,
        }),
        OutputFormat::Csv => write_csv(table, path),
    }
}

fn write_xlsx(table: &ResultTable, path: &Path) -> Result<(), XlsxError> {
    let columns = table.columns();
    let dates = table.date_columns();
    let header_format = Format::new().set_bold();

    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, label) in columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as ColNum, label, &header_format)?;
        }

        for (i, row) in table.rows().iter().enumerate() {
            let r = (i + 1) as RowNum;
            worksheet.write_string(r, 0, &row.ticker)?;
            worksheet.write_number(r, 1, row.weight)?;
            for (j, date) in dates.iter().enumerate() {
                // missing dates stay blank
                if let Some(shares) = row.shares.get(date) {
                    worksheet.write_number(r, (j + 2) as ColNum, *shares)?;
                }
            }
        }
    }
    workbook.save(path)
}

fn write_csv(table: &ResultTable, path: &Path) -> Result<(), WriteError> {
    let csv_err = |source: csv::Error| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let dates = table.date_columns();

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    wtr.write_record(table.columns()).map_err(csv_err)?;
    for row in table.rows() {
        let mut record = vec![row.ticker.clone(), row.weight.to_string()];
        record.extend(
            dates
                .iter()
                .map(|d| row.shares.get(d).map(f64::to_string).unwrap_or_default()),
        );
        wtr.write_record(&record).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
