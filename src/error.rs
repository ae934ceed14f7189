// =============================================================================
// Domain errors for bar ingestion and analysis configuration
// =============================================================================
//
// Only conditions that must abort a symbol's analysis live here.  Short
// history and flat stochastic ranges are not errors: the indicator functions
// return `None` for those positions instead.
// =============================================================================

use chrono::NaiveDate;
use thiserror::Error;

/// A bar series that cannot be analysed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("bar dates not strictly increasing at index {index}: {previous} then {current}")]
    NonMonotonic {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("bar on {date} has invalid {field}: {value}")]
    InvalidPrice {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("bar on {date} has high {high} below low {low}")]
    InvertedRange { date: NaiveDate, high: f64, low: f64 },

    #[error("bar on {date} has {field} {value} outside its range {low}..={high}")]
    OutsideRange {
        date: NaiveDate,
        field: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("bar record {index} is missing field {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("bar record {index} has unparsable date {raw:?}")]
    InvalidDate { index: usize, raw: String },
}

/// Analysis parameters that cannot produce meaningful series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window {name} must be at least 1")]
    ZeroWindow { name: &'static str },

    #[error("parameter out of range: {param} = {value} (valid: {min}..={max})")]
    OutOfRange {
        param: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("stochastic lower limit {low} must be below upper limit {high}")]
    InvertedLimits { low: f64, high: f64 },
}
