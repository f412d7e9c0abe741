//! Collects the date range and investment amount from the console.
use crate::core::validation::RawInputs;
use std::io::{self, BufRead, Write};

pub const START_PROMPT: &str = "Enter the start date (YYYY-MM-DD): ";
pub const END_PROMPT: &str = "Enter the last date (YYYY-MM-DD): ";
pub const AMOUNT_PROMPT: &str = "Enter the total investment amount: ";

/// Values already supplied on the command line; `None` means ask.
#[derive(Debug, Clone, Default)]
pub struct PresetInputs {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_investment: Option<String>,
}

impl PresetInputs {
    pub fn is_complete(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some() && self.total_investment.is_some()
    }
}

/// Prompts for every value missing from `preset`, in start, end, amount order.
///
/// End of input yields an empty answer, which validation then rejects.
pub fn collect_inputs<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    preset: PresetInputs,
) -> io::Result<RawInputs> {
    let start_date = answer_or_ask(reader, writer, preset.start_date, START_PROMPT)?;
    let end_date = answer_or_ask(reader, writer, preset.end_date, END_PROMPT)?;
    let total_investment = answer_or_ask(reader, writer, preset.total_investment, AMOUNT_PROMPT)?;
    Ok(RawInputs {
        start_date,
        end_date,
        total_investment,
    })
}

fn answer_or_ask<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    preset: Option<String>,
    prompt: &str,
) -> io::Result<String> {
    if let Some(value) = preset {
        return Ok(value);
    }
    write!(writer, "{prompt}")?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
