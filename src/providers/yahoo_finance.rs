use crate::core::price::{DateRange, HistoryProvider, PricePoint, PriceSeries};
use crate::providers::util::{RetryPolicy, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{debug, instrument};

fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn extract_closes(item: &ChartItem) -> Vec<PricePoint> {
    let offset = item.meta.gmtoffset.unwrap_or(0);
    let (Some(timestamps), Some(closes)) = (
        item.timestamp.as_ref(),
        item.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            // bars are stamped at the exchange open, so shift to exchange local time first
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            close.map(|close| PricePoint { date, close })
        })
        .collect()
}

// YahooHistoryProvider implementation for HistoryProvider
pub struct YahooHistoryProvider {
    base_url: String,
    retry: RetryPolicy,
}

impl YahooHistoryProvider {
    pub fn new(base_url: &str) -> Self {
        YahooHistoryProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn history_url(&self, symbol: &str, range: DateRange) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url,
            symbol,
            day_start_timestamp(range.start),
            day_start_timestamp(range.end)
        )
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[async_trait]
impl HistoryProvider for YahooHistoryProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol, range = %range)
    )]
    async fn fetch_history(&self, symbol: &str, range: DateRange) -> Result<PriceSeries> {
        let url = self.history_url(symbol, range);
        debug!("Requesting price history from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("stockalloc/1.0")
            .build()?;
        let response = with_retry(|| client.get(&url).send(), self.retry)
            .await
            .with_context(|| format!("Request error for symbol: {symbol}"))?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%status, bytes = text.len(), "Received Yahoo response");

        // error payloads come with a 4xx status but still describe the failure
        let parsed = serde_json::from_str::<YahooChartResponse>(&text);
        if let Ok(YahooChartResponse {
            chart:
                ChartResult {
                    error: Some(err), ..
                },
        }) = &parsed
        {
            return Err(anyhow!(
                "{}: {} for symbol: {}",
                err.code,
                err.description.as_deref().unwrap_or("no description"),
                symbol
            ));
        }
        if !status.is_success() {
            return Err(anyhow!("HTTP error: {} for symbol: {}", status, symbol));
        }

        let data =
            parsed.with_context(|| format!("Failed to parse JSON response for {symbol}"))?;
        let item = data
            .chart
            .result
            .as_ref()
            .and_then(|r| r.first())
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let series = PriceSeries::new(symbol, extract_closes(item));
        if series.is_empty() {
            return Err(anyhow!(
                "No price data found for symbol: {} in {}",
                symbol,
                range
            ));
        }
        debug!(points = series.len(), "Parsed price history");
        Ok(series)
    }
}
