//! Name-keyed market function table
//!
//! The dispatch surface `market.*` calls resolve against, mirroring the
//! function table the generated JavaScript awaits. Names outside the
//! table are a runtime concern of the calling program, so they error here
//! at call time rather than at compile time.

use crate::error::{Result, RuntimeError};
use crate::market::client::MarketDataClient;
use crate::market::MarketProvider;
use async_trait::async_trait;
use riyal_core::Value;
use serde::Serialize;

/// The market function table backed by the HTTP client
pub struct MarketFunctions {
    client: MarketDataClient,
}

impl MarketFunctions {
    /// Create a table over an explicit client
    pub fn new(client: MarketDataClient) -> Self {
        Self { client }
    }

    /// Create a table with the API key from the environment
    pub fn from_env() -> Self {
        Self::new(MarketDataClient::from_env())
    }

    /// Dispatch a call by function name; `Null` means no data
    pub async fn dispatch(&self, function: &str, symbol: &str) -> Result<Value> {
        match function {
            "getStockPrice" => {
                let quote = self.client.fetch_quote(symbol).await?;
                Ok(number_or_null(quote.map(|q| q.price)))
            }
            "getOpenPrice" => {
                let quote = self.client.fetch_quote(symbol).await?;
                Ok(number_or_null(quote.map(|q| q.open)))
            }
            "getHighPrice" => {
                let quote = self.client.fetch_quote(symbol).await?;
                Ok(number_or_null(quote.map(|q| q.high)))
            }
            "getLowPrice" => {
                let quote = self.client.fetch_quote(symbol).await?;
                Ok(number_or_null(quote.map(|q| q.low)))
            }
            "get52WeekHigh" => {
                let stats = self.client.fetch_weekly(symbol).await?;
                Ok(number_or_null(stats.map(|s| s.week52_high)))
            }
            "isAllTimeHigh" => {
                let report = self.client.check_all_time_high(symbol).await?;
                Ok(Value::Bool(
                    report.map(|r| r.is_all_time_high).unwrap_or(false),
                ))
            }
            "getStockInfo" => match self.client.fetch_quote(symbol).await? {
                Some(quote) => to_value(&quote),
                None => Ok(Value::Null),
            },
            "scanStocks" => {
                // The single symbol argument carries a comma-separated list.
                let symbols: Vec<String> = symbol
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                let reports = self.client.scan_stocks(&symbols).await?;
                let values = reports
                    .iter()
                    .map(to_value)
                    .collect::<Result<Vec<Value>>>()?;
                Ok(Value::Array(values))
            }
            other => Err(RuntimeError::UnknownMarketFunction(other.to_string())),
        }
    }
}

#[async_trait]
impl MarketProvider for MarketFunctions {
    async fn call(&self, function: &str, symbol: &str) -> Result<Value> {
        self.dispatch(function, symbol).await
    }
}

fn number_or_null(value: Option<f64>) -> Value {
    match value {
        Some(n) => Value::Number(n),
        None => Value::Null,
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    let json = serde_json::to_value(value)?;
    Ok(serde_json::from_value(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::client::StockQuote;
    use chrono::Utc;

    #[test]
    fn test_number_or_null() {
        assert_eq!(number_or_null(Some(1.5)), Value::Number(1.5));
        assert_eq!(number_or_null(None), Value::Null);
    }

    #[test]
    fn test_quote_converts_to_object_value() {
        let quote = StockQuote {
            symbol: "AAPL".to_string(),
            price: 187.5,
            change: 1.3,
            change_percent: 0.7,
            volume: 1000.0,
            high: 189.2,
            low: 185.1,
            open: 186.0,
            previous_close: 186.2,
            timestamp: Utc::now(),
        };

        match to_value(&quote).unwrap() {
            Value::Object(map) => {
                assert_eq!(map.get("symbol"), Some(&Value::String("AAPL".to_string())));
                assert_eq!(map.get("price"), Some(&Value::Number(187.5)));
            }
            other => panic!("Expected Object, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_function_errors_at_call_time() {
        let table = MarketFunctions::new(MarketDataClient::new("demo"));
        let err = table.dispatch("notARealFunction", "AAPL").await.unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownMarketFunction(name) if name == "notARealFunction"));
    }
}
