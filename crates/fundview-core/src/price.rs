//! Share-price types.
//!
//! This module defines [`PriceBar`] for one trading day and [`PriceField`]
//! for selecting which column of a bar to chart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// One daily price bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price during the day.
    pub high: Option<f64>,
    /// Lowest price during the day.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Split/dividend adjusted closing price.
    pub adjusted_close: Option<f64>,
    /// Trading volume.
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Returns the value of `field` for this bar.
    #[must_use]
    pub fn field(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjustedClose => self.adjusted_close,
            PriceField::Volume => self.volume.map(|v| v as f64),
        }
    }
}

/// Column of a [`PriceBar`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceField {
    /// Opening price.
    Open,
    /// Daily high.
    High,
    /// Daily low.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// Adjusted closing price.
    AdjustedClose,
    /// Volume.
    Volume,
}

impl PriceField {
    /// Returns the column name used in tables and frames.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::AdjustedClose => "adjusted_close",
            Self::Volume => "volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            "adj-close" | "adjusted-close" => Ok(Self::AdjustedClose),
            "volume" => Ok(Self::Volume),
            other => Err(DataError::InvalidParameter(format!(
                "Unknown price column: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: Some(187.15),
            high: Some(188.44),
            low: Some(183.89),
            close: Some(185.64),
            adjusted_close: Some(184.73),
            volume: Some(82_488_700),
        }
    }

    #[test]
    fn test_field_selection() {
        let bar = bar();
        assert_eq!(bar.field(PriceField::Close), Some(185.64));
        assert_eq!(bar.field(PriceField::AdjustedClose), Some(184.73));
        assert_eq!(bar.field(PriceField::Volume), Some(82_488_700.0));
    }

    #[test]
    fn test_parse_field() {
        assert_eq!("Close".parse::<PriceField>().unwrap(), PriceField::Close);
        assert_eq!("Adj Close".parse::<PriceField>().unwrap(), PriceField::AdjustedClose);
        assert_eq!("adjusted_close".parse::<PriceField>().unwrap(), PriceField::AdjustedClose);
        assert!("vwap".parse::<PriceField>().is_err());
    }
}
