// =============================================================================
// Marketstack end-of-day response parsing
// =============================================================================
//
// Expected shape (newest bar first):
// ```json
// { "pagination": { ... },
//   "data": [ { "date": "2021-01-15T00:00:00+0000", "open": 1.0, "high": 1.0,
//               "low": 1.0, "close": 1.0, "volume": 100.0, ... }, ... ] }
// ```
// Failures come back as `{ "error": { "code": "...", "message": "..." } }`.
// =============================================================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::InputError;
use crate::market_data::{Bar, BarSeries};

#[derive(Debug, Deserialize)]
struct EodResponse {
    #[serde(default)]
    data: Vec<EodRecord>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct EodRecord {
    date: Option<String>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl EodRecord {
    fn into_bar(self, index: usize) -> Result<Bar, InputError> {
        let missing = |field| InputError::MissingField { index, field };

        let raw_date = self.date.ok_or_else(|| missing("date"))?;
        let date = raw_date
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| InputError::InvalidDate {
                index,
                raw: raw_date.clone(),
            })?;

        let volume = self.volume.ok_or_else(|| missing("volume"))?;
        if !volume.is_finite() || volume < 0.0 {
            return Err(InputError::InvalidPrice {
                date,
                field: "volume",
                value: volume,
            });
        }

        Ok(Bar {
            date,
            open: self.open.ok_or_else(|| missing("open"))?,
            high: self.high.ok_or_else(|| missing("high"))?,
            low: self.low.ok_or_else(|| missing("low"))?,
            close: self.close.ok_or_else(|| missing("close"))?,
            volume: volume.round() as u64,
        })
    }
}

/// Parse a raw end-of-day body into an oldest-first [`BarSeries`].
pub fn parse_eod(body: &str) -> Result<BarSeries> {
    let response: EodResponse =
        serde_json::from_str(body).context("failed to parse end-of-day JSON")?;

    if let Some(err) = response.error {
        anyhow::bail!("Marketstack error {}: {}", err.code, err.message);
    }

    let mut bars = response
        .data
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_bar(index))
        .collect::<Result<Vec<_>, _>>()?;
    bars.reverse();

    Ok(BarSeries::new(bars)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pagination": { "limit": 3, "offset": 0, "count": 3, "total": 3 },
        "data": [
            { "open": 12.0, "high": 12.5, "low": 11.5, "close": 12.2, "volume": 1500.0,
              "adj_close": 12.2, "symbol": "NOKIA.XHEL", "exchange": "XHEL",
              "date": "2021-01-15T00:00:00+0000" },
            { "open": 11.0, "high": 12.1, "low": 10.9, "close": 12.0, "volume": 1200.0,
              "symbol": "NOKIA.XHEL", "exchange": "XHEL",
              "date": "2021-01-14T00:00:00+0000" },
            { "open": 10.0, "high": 11.2, "low": 9.8, "close": 11.0, "volume": 900.4,
              "symbol": "NOKIA.XHEL", "exchange": "XHEL",
              "date": "2021-01-12T00:00:00+0000" }
        ]
    }"#;

    #[test]
    fn newest_first_becomes_oldest_first() {
        let series = parse_eod(SAMPLE).expect("should parse");
        assert_eq!(series.len(), 3);
        let dates: Vec<String> = series.bars().iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2021-01-12", "2021-01-14", "2021-01-15"]);
        assert_eq!(series.bars()[0].volume, 900);
        assert!((series.last().close - 12.2).abs() < f64::EPSILON);
    }

    #[test]
    fn api_error_is_reported() {
        let body = r#"{ "error": { "code": "invalid_access_key", "message": "You have not supplied a valid API Access Key." } }"#;
        let err = parse_eod(body).unwrap_err();
        assert!(err.to_string().contains("invalid_access_key"));
    }

    #[test]
    fn null_price_is_missing_field() {
        let body = r#"{ "data": [ { "date": "2021-01-15T00:00:00+0000", "open": 1.0,
            "high": null, "low": 1.0, "close": 1.0, "volume": 1.0 } ] }"#;
        let err = parse_eod(body).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::MissingField { index: 0, field: "high" })
        );
    }

    #[test]
    fn empty_data_is_empty_series() {
        let err = parse_eod(r#"{ "data": [] }"#).unwrap_err();
        assert_eq!(err.downcast_ref::<InputError>(), Some(&InputError::EmptySeries));
    }

    #[test]
    fn bad_date_is_rejected() {
        let body = r#"{ "data": [ { "date": "15.01.2021", "open": 1.0,
            "high": 1.0, "low": 1.0, "close": 1.0, "volume": 1.0 } ] }"#;
        let err = parse_eod(body).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::InvalidDate { index: 0, .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_eod("not json").is_err());
    }
}
