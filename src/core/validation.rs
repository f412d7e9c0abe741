//! Checks the raw console inputs before any file or network work happens.
use crate::core::price::DateRange;
use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: Total investment must be a number.")]
    InvalidAmount,
    #[error("Error: Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDate,
    #[error("Error: Dates must be in the past.")]
    FutureDate,
    #[error("Error: End date cannot be earlier than the start date.")]
    EndBeforeStart,
    #[error("Error: Investment amount must be greater than zero.")]
    NonPositiveAmount,
}

/// The three values collected from the user, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub start_date: String,
    pub end_date: String,
    pub total_investment: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInputs {
    pub range: DateRange,
    pub total_investment: f64,
}

/// Validates inputs against `today`, reporting the first violated rule.
///
/// Rules are checked in order: amount is numeric, dates are ISO formatted, neither date
/// is after `today`, end is not before start, amount is positive.
pub fn validate(raw: &RawInputs, today: NaiveDate) -> Result<ValidatedInputs, ValidationError> {
    let total_investment = parse_amount(&raw.total_investment)?;

    let start = parse_date(&raw.start_date)?;
    let end = parse_date(&raw.end_date)?;

    if start > today || end > today {
        return Err(ValidationError::FutureDate);
    }
    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }
    if total_investment <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }

    Ok(ValidatedInputs {
        range: DateRange::new(start, end),
        total_investment,
    })
}

fn parse_amount(s: &str) -> Result<f64, ValidationError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::InvalidAmount)
}

fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn raw(start: &str, end: &str, amount: &str) -> RawInputs {
        RawInputs {
            start_date: start.to_string(),
            end_date: end.to_string(),
            total_investment: amount.to_string(),
        }
    }

    #[test]
    fn test_valid_inputs() {
        let inputs = validate(&raw("2023-01-02", "2023-01-03", "10000"), today()).unwrap();
        assert_eq!(
            inputs.range.start,
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
        );
        assert_eq!(inputs.range.end, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(inputs.total_investment, 10000.0);
    }

    #[test]
    fn test_amount_is_checked_before_dates() {
        let err = validate(&raw("not-a-date", "also-bad", "abc"), today()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmount);
        assert_eq!(err.to_string(), "Error: Total investment must be a number.");
    }

    #[test]
    fn test_non_finite_amount_is_not_a_number() {
        assert_eq!(
            validate(&raw("2023-01-02", "2023-01-03", "NaN"), today()).unwrap_err(),
            ValidationError::InvalidAmount
        );
        assert_eq!(
            validate(&raw("2023-01-02", "2023-01-03", "inf"), today()).unwrap_err(),
            ValidationError::InvalidAmount
        );
    }

    #[test]
    fn test_bad_date_format() {
        assert_eq!(
            validate(&raw("02/01/2023", "2023-01-03", "100"), today()).unwrap_err(),
            ValidationError::InvalidDate
        );
        assert_eq!(
            validate(&raw("2023-01-02", "2023-13-01", "100"), today()).unwrap_err(),
            ValidationError::InvalidDate
        );
    }

    #[test]
    fn test_date_format_is_checked_before_amount_sign() {
        assert_eq!(
            validate(&raw("yesterday", "2023-01-03", "-5"), today()).unwrap_err(),
            ValidationError::InvalidDate
        );
    }

    #[test]
    fn test_future_dates_rejected() {
        assert_eq!(
            validate(&raw("2024-06-16", "2024-06-17", "100"), today()).unwrap_err(),
            ValidationError::FutureDate
        );
        assert_eq!(
            validate(&raw("2024-06-01", "2024-06-16", "100"), today()).unwrap_err(),
            ValidationError::FutureDate
        );
        // today itself is not in the future
        assert!(validate(&raw("2024-06-15", "2024-06-15", "100"), today()).is_ok());
    }

    #[test]
    fn test_future_is_checked_before_ordering() {
        assert_eq!(
            validate(&raw("2024-07-01", "2024-01-01", "100"), today()).unwrap_err(),
            ValidationError::FutureDate
        );
    }

    #[test]
    fn test_end_before_start() {
        let err = validate(&raw("2023-01-03", "2023-01-02", "100"), today()).unwrap_err();
        assert_eq!(err, ValidationError::EndBeforeStart);
    }

    #[test]
    fn test_ordering_is_checked_before_amount_sign() {
        assert_eq!(
            validate(&raw("2023-01-03", "2023-01-02", "0"), today()).unwrap_err(),
            ValidationError::EndBeforeStart
        );
    }

    #[test]
    fn test_non_positive_amount() {
        assert_eq!(
            validate(&raw("2023-01-02", "2023-01-03", "0"), today()).unwrap_err(),
            ValidationError::NonPositiveAmount
        );
        assert_eq!(
            validate(&raw("2023-01-02", "2023-01-03", "-250.5"), today()).unwrap_err(),
            ValidationError::NonPositiveAmount
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let inputs = validate(&raw(" 2023-01-02", "2023-01-03 ", " 500.5 "), today()).unwrap();
        assert_eq!(inputs.total_investment, 500.5);
    }
}
