use chrono::NaiveDate;

use crate::error::InputError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single end-of-day OHLCV bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Midpoint of the day's range.
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InputError::InvalidPrice {
                    date: self.date,
                    field,
                    value,
                });
            }
        }
        if self.high < self.low {
            return Err(InputError::InvertedRange {
                date: self.date,
                high: self.high,
                low: self.low,
            });
        }
        for (field, value) in [("open", self.open), ("close", self.close)] {
            if value < self.low || value > self.high {
                return Err(InputError::OutsideRange {
                    date: self.date,
                    field,
                    value,
                    low: self.low,
                    high: self.high,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BarSeries -- validated, oldest-first, never empty
// ---------------------------------------------------------------------------

/// Bars for one symbol in strictly ascending date order.
///
/// Construction is the only validation point, so every consumer can rely on
/// a non-empty, gap-tolerant, duplicate-free series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap `bars` (oldest first).
    ///
    /// # Errors
    /// - empty input
    /// - a date not strictly after its predecessor (duplicates included)
    /// - a non-finite or non-positive price, or `high < low`
    pub fn new(bars: Vec<Bar>) -> Result<Self, InputError> {
        if bars.is_empty() {
            return Err(InputError::EmptySeries);
        }

        for (index, bar) in bars.iter().enumerate() {
            bar.validate()?;
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date <= previous {
                    return Err(InputError::NonMonotonic {
                        index,
                        previous,
                        current: bar.date,
                    });
                }
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Most recent bar.  Never fails: the series is non-empty by construction.
    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn hl2(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::hl2).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
