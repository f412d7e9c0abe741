//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Display;

/// Calendar range requested by the user. Providers treat `end` as exclusive, so no close
/// from the end date itself is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Closing price of a security on one trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closing prices for one symbol, ordered by date with one entry per trading day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, sorting by date and keeping the last close seen for a repeated date.
    pub fn new(symbol: &str, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        // dedup_by keeps the first of a run, so walk from the back
        points.reverse();
        points.dedup_by_key(|p| p.date);
        points.reverse();
        Self {
            symbol: symbol.to_string(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetches daily closes for `symbol` in `range`, failing when nothing usable comes back.
    async fn fetch_history(&self, symbol: &str, range: DateRange) -> Result<PriceSeries>;
}
