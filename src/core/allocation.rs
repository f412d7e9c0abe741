//! Splits the investment across tickers and tabulates purchasable shares per trading day.
use crate::core::price::{DateRange, HistoryProvider, PriceSeries};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

pub const TICKER_HEADER: &str = "Ticker";
pub const WEIGHT_HEADER: &str = "Weightage";

/// One row of the input table.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    pub ticker: String,
    pub weight: f64,
}

impl AllocationRequest {
    pub fn new(ticker: &str, weight: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            weight,
        }
    }
}

/// Appends the exchange suffix unless the ticker already carries it.
pub fn normalize_ticker(ticker: &str, suffix: &str) -> String {
    if ticker.ends_with(suffix) {
        ticker.to_string()
    } else {
        format!("{ticker}{suffix}")
    }
}

/// Shares purchasable for one ticker, keyed by ISO date label.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub ticker: String,
    pub weight: f64,
    pub shares: BTreeMap<String, f64>,
}

impl ResultRow {
    /// Derives shares = investment * weight / close for every date with a positive close.
    pub fn from_series(
        ticker: &str,
        weight: f64,
        total_investment: f64,
        series: &PriceSeries,
    ) -> Self {
        let allocation = total_investment * weight;
        let mut shares = BTreeMap::new();
        for point in &series.points {
            if point.close <= 0.0 {
                warn!(
                    ticker,
                    date = %point.date,
                    close = point.close,
                    "Skipping date with non-positive closing price"
                );
                continue;
            }
            shares.insert(
                point.date.format("%Y-%m-%d").to_string(),
                allocation / point.close,
            );
        }
        Self {
            ticker: ticker.to_string(),
            weight,
            shares,
        }
    }

    pub fn allocation(&self, total_investment: f64) -> f64 {
        total_investment * self.weight
    }
}

/// Rows in emission order, materialised with the sorted union of their dates as columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Every date label seen in any row, ascending. ISO labels sort chronologically.
    pub fn date_columns(&self) -> Vec<String> {
        let dates: BTreeSet<&String> = self.rows.iter().flat_map(|r| r.shares.keys()).collect();
        dates.into_iter().cloned().collect()
    }

    /// Header labels: ticker, weight, then the date columns.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![TICKER_HEADER.to_string(), WEIGHT_HEADER.to_string()];
        columns.extend(self.date_columns());
        columns
    }
}

impl FromIterator<ResultRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Progress notifications emitted while the allocation runs.
#[derive(Debug)]
pub enum AllocationEvent<'a> {
    Fetching { ticker: &'a str },
    Allocated { row: &'a ResultRow },
    Skipped { ticker: &'a str, error: &'a anyhow::Error },
}

/// Parameters shared by every row of one run.
#[derive(Debug, Clone)]
pub struct AllocationPlan {
    pub range: DateRange,
    pub total_investment: f64,
    pub exchange_suffix: String,
}

/// Fetches each ticker in input order, one at a time, and collects the rows that succeeded.
///
/// A failed fetch is reported through `on_event` and the ticker contributes nothing to the
/// table. Nothing is retried here; retries belong to the provider.
pub async fn allocate(
    provider: &(dyn HistoryProvider + Send + Sync),
    requests: &[AllocationRequest],
    plan: &AllocationPlan,
    on_event: &mut (dyn FnMut(AllocationEvent<'_>) + Send),
) -> ResultTable {
    let weight_sum: f64 = requests.iter().map(|r| r.weight).sum();
    debug!(
        rows = requests.len(),
        weight_sum,
        range = %plan.range,
        "Starting allocation"
    );

    let mut table = ResultTable::new();
    for request in requests {
        let ticker = normalize_ticker(&request.ticker, &plan.exchange_suffix);
        on_event(AllocationEvent::Fetching { ticker: &ticker });

        match provider.fetch_history(&ticker, plan.range).await {
            Ok(series) => {
                let row =
                    ResultRow::from_series(&ticker, request.weight, plan.total_investment, &series);
                debug!(ticker = %ticker, dates = row.shares.len(), "Allocated");
                on_event(AllocationEvent::Allocated { row: &row });
                table.push(row);
            }
            Err(error) => {
                warn!(ticker = %ticker, error = %error, "Skipping ticker");
                on_event(AllocationEvent::Skipped {
                    ticker: &ticker,
                    error: &error,
                });
            }
        }
    }
    table
}
