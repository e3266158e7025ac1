//! Alpha Vantage market-data client
//!
//! Global-quote and weekly-series lookups with a per-symbol cache. A
//! missing or empty payload surfaces as `Ok(None)` ("no data"), not an
//! error; transport and parse failures are errors.

use crate::error::Result;
use crate::market::cache::MarketCache;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";
/// Pause between symbols in a scan, to respect API rate limits
const SCAN_DELAY: Duration = Duration::from_millis(200);

/// A single global quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
    pub timestamp: DateTime<Utc>,
}

/// 52-week statistics derived from the weekly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub symbol: String,
    pub week52_high: f64,
    pub week52_low: f64,
    pub current_price: f64,
    pub is_at_52_week_high: bool,
    pub weeks_analyzed: usize,
}

/// All-time-high check result for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTimeHighReport {
    pub symbol: String,
    pub current_price: f64,
    pub week52_high: f64,
    pub is_all_time_high: bool,
    /// Distance from the 52-week high, in percent, rounded to 2 decimals
    pub percentage_from_high: f64,
    pub alert: String,
}

/// HTTP client over the quote API with per-symbol caching
pub struct MarketDataClient {
    http: reqwest::Client,
    api_key: String,
    quotes: Mutex<MarketCache<Option<StockQuote>>>,
    weekly: Mutex<MarketCache<Option<WeeklyStats>>>,
}

impl MarketDataClient {
    /// Create a client with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            quotes: Mutex::new(MarketCache::new()),
            weekly: Mutex::new(MarketCache::new()),
        }
    }

    /// Create a client with the key from `ALPHA_VANTAGE_API_KEY`,
    /// falling back to the API's demo key
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_else(|_| "demo".to_string());
        Self::new(api_key)
    }

    /// Fetch the current global quote for a symbol
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Option<StockQuote>> {
        if let Some(cached) = self.quotes.lock().map(|cache| cache.get(symbol)).ok().flatten() {
            tracing::debug!("quote cache hit for {}", symbol);
            return Ok(cached);
        }

        let url = format!(
            "{}?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            BASE_URL,
            urlencoding::encode(symbol),
            self.api_key
        );
        tracing::debug!("fetching global quote for {}", symbol);
        let payload: serde_json::Value = self.http.get(&url).send().await?.json().await?;

        let quote = parse_global_quote(&payload);
        if quote.is_none() {
            tracing::warn!("no quote data for symbol {}", symbol);
        }
        if let Ok(mut cache) = self.quotes.lock() {
            cache.set(symbol, quote.clone());
        }
        Ok(quote)
    }

    /// Fetch 52-week statistics from the weekly series
    pub async fn fetch_weekly(&self, symbol: &str) -> Result<Option<WeeklyStats>> {
        if let Some(cached) = self.weekly.lock().map(|cache| cache.get(symbol)).ok().flatten() {
            tracing::debug!("weekly cache hit for {}", symbol);
            return Ok(cached);
        }

        let url = format!(
            "{}?function=TIME_SERIES_WEEKLY&symbol={}&apikey={}",
            BASE_URL,
            urlencoding::encode(symbol),
            self.api_key
        );
        tracing::debug!("fetching weekly series for {}", symbol);
        let payload: serde_json::Value = self.http.get(&url).send().await?.json().await?;

        let stats = parse_weekly_series(symbol, &payload);
        if stats.is_none() {
            tracing::warn!("no weekly data for symbol {}", symbol);
        }
        if let Ok(mut cache) = self.weekly.lock() {
            cache.set(symbol, stats.clone());
        }
        Ok(stats)
    }

    /// Check whether a symbol trades at (or near) its 52-week high
    pub async fn check_all_time_high(&self, symbol: &str) -> Result<Option<AllTimeHighReport>> {
        let Some(stats) = self.fetch_weekly(symbol).await? else {
            return Ok(None);
        };

        let percentage_from_high =
            ((stats.current_price - stats.week52_high) / stats.week52_high * 100.0 * 100.0)
                .round()
                / 100.0;
        let alert = if stats.is_at_52_week_high {
            format!("{} is at/near 52-week high!", symbol)
        } else {
            format!("{} is {}% from 52-week high", symbol, percentage_from_high)
        };

        Ok(Some(AllTimeHighReport {
            symbol: symbol.to_string(),
            current_price: stats.current_price,
            week52_high: stats.week52_high,
            is_all_time_high: stats.is_at_52_week_high,
            percentage_from_high,
            alert,
        }))
    }

    /// Check several symbols in sequence, pacing requests; symbols with no
    /// data are skipped
    pub async fn scan_stocks(&self, symbols: &[String]) -> Result<Vec<AllTimeHighReport>> {
        let mut reports = Vec::new();
        for symbol in symbols {
            if let Some(report) = self.check_all_time_high(symbol).await? {
                reports.push(report);
            }
            tokio::time::sleep(SCAN_DELAY).await;
        }
        Ok(reports)
    }
}

fn parse_global_quote(payload: &serde_json::Value) -> Option<StockQuote> {
    let quote = payload.get("Global Quote")?;
    let symbol = quote.get("01. symbol")?.as_str()?.to_string();

    Some(StockQuote {
        symbol,
        open: field_number(quote, "02. open")?,
        high: field_number(quote, "03. high")?,
        low: field_number(quote, "04. low")?,
        price: field_number(quote, "05. price")?,
        volume: field_number(quote, "06. volume")?,
        previous_close: field_number(quote, "08. previous close")?,
        change: field_number(quote, "09. change")?,
        change_percent: quote
            .get("10. change percent")?
            .as_str()?
            .trim_end_matches('%')
            .parse()
            .ok()?,
        timestamp: Utc::now(),
    })
}

fn parse_weekly_series(symbol: &str, payload: &serde_json::Value) -> Option<WeeklyStats> {
    let series = payload.get("Weekly Time Series")?.as_object()?;
    if series.is_empty() {
        return None;
    }

    // Latest 52 weeks; keys are ISO dates, so lexicographic order is
    // chronological.
    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    let weeks: Vec<&serde_json::Value> = dates.iter().take(52).map(|d| &series[d.as_str()]).collect();

    let highs: Vec<f64> = weeks
        .iter()
        .filter_map(|week| field_number(week, "2. high"))
        .collect();
    let lows: Vec<f64> = weeks
        .iter()
        .filter_map(|week| field_number(week, "3. low"))
        .collect();
    if highs.is_empty() || lows.is_empty() {
        return None;
    }

    let week52_high = highs.iter().cloned().fold(f64::MIN, f64::max);
    let week52_low = lows.iter().cloned().fold(f64::MAX, f64::min);
    let current_price = field_number(weeks[0], "4. close")?;

    Some(WeeklyStats {
        symbol: symbol.to_string(),
        week52_high,
        week52_low,
        current_price,
        // Within 99% of the high counts as "at the high"
        is_at_52_week_high: current_price >= week52_high * 0.99,
        weeks_analyzed: weeks.len(),
    })
}

fn field_number(value: &serde_json::Value, key: &str) -> Option<f64> {
    value.get(key)?.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_quote_payload() -> serde_json::Value {
        json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "02. open": "186.00",
                "03. high": "189.20",
                "04. low": "185.10",
                "05. price": "187.50",
                "06. volume": "52389120",
                "07. latest trading day": "2024-05-17",
                "08. previous close": "186.20",
                "09. change": "1.30",
                "10. change percent": "0.6982%"
            }
        })
    }

    #[test]
    fn test_parse_global_quote() {
        let quote = parse_global_quote(&sample_quote_payload()).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 187.5);
        assert_eq!(quote.open, 186.0);
        assert_eq!(quote.change_percent, 0.6982);
        assert_eq!(quote.volume, 52389120.0);
    }

    #[test]
    fn test_parse_global_quote_without_data() {
        assert!(parse_global_quote(&json!({})).is_none());
        assert!(parse_global_quote(&json!({"Global Quote": {}})).is_none());
    }

    #[test]
    fn test_parse_weekly_series() {
        let payload = json!({
            "Weekly Time Series": {
                "2024-05-17": {"1. open": "185", "2. high": "190", "3. low": "184", "4. close": "189"},
                "2024-05-10": {"1. open": "180", "2. high": "186", "3. low": "178", "4. close": "185"},
                "2024-05-03": {"1. open": "175", "2. high": "181", "3. low": "150", "4. close": "180"}
            }
        });

        let stats = parse_weekly_series("AAPL", &payload).unwrap();
        assert_eq!(stats.week52_high, 190.0);
        assert_eq!(stats.week52_low, 150.0);
        assert_eq!(stats.current_price, 189.0);
        assert!(stats.is_at_52_week_high);
        assert_eq!(stats.weeks_analyzed, 3);
    }

    #[test]
    fn test_parse_weekly_series_below_high() {
        let payload = json!({
            "Weekly Time Series": {
                "2024-05-17": {"1. open": "150", "2. high": "155", "3. low": "148", "4. close": "152"},
                "2024-05-10": {"1. open": "180", "2. high": "190", "3. low": "178", "4. close": "185"}
            }
        });

        let stats = parse_weekly_series("AAPL", &payload).unwrap();
        assert!(!stats.is_at_52_week_high);
        assert_eq!(stats.current_price, 152.0);
    }

    #[test]
    fn test_parse_weekly_series_without_data() {
        assert!(parse_weekly_series("AAPL", &json!({})).is_none());
        assert!(parse_weekly_series("AAPL", &json!({"Weekly Time Series": {}})).is_none());
    }
}
