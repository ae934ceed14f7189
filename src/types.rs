// =============================================================================
// Shared types used across the scanner
// =============================================================================

use serde::Deserialize;

/// One configured market symbol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instrument {
    /// Ticker understood by the bar vendor, e.g. `ABB.XSTO`.
    pub data_symbol: String,

    /// Ticker understood by the quote-lookup site, e.g. `OMXSTO:ABB`.
    pub chart_symbol: String,

    /// Human-readable name, also used as the certificate underlying name.
    pub name: String,
}

impl Instrument {
    pub fn new(
        data_symbol: impl Into<String>,
        chart_symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            data_symbol: data_symbol.into(),
            chart_symbol: chart_symbol.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.data_symbol)
    }
}

/// Which side a breakout rule fired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakoutDirection {
    Upward,
    Downward,
}

impl BreakoutDirection {
    /// Direction code expected by the certificate listing: an upward
    /// breakout points at down-certificates and vice versa.
    pub fn listing_code(self) -> &'static str {
        match self {
            Self::Upward => "D",
            Self::Downward => "U",
        }
    }
}

impl std::fmt::Display for BreakoutDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upward => write!(f, "Upward"),
            Self::Downward => write!(f, "Downward"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_codes_are_inverted() {
        assert_eq!(BreakoutDirection::Upward.listing_code(), "D");
        assert_eq!(BreakoutDirection::Downward.listing_code(), "U");
    }

    #[test]
    fn instrument_deserialises_from_config_shape() {
        let json = r#"{ "data_symbol": "SLV", "chart_symbol": "SLV", "name": "Silver" }"#;
        let inst: Instrument = serde_json::from_str(json).unwrap();
        assert_eq!(inst, Instrument::new("SLV", "SLV", "Silver"));
        assert_eq!(inst.to_string(), "Silver (SLV)");
    }
}
