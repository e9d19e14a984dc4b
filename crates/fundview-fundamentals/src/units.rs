//! Display scaling for dollar amounts.

use fundview_core::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale used when displaying dollar amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitScale {
    /// Billions of dollars.
    Billions,
    /// Millions of dollars.
    Millions,
    /// Whole dollars.
    Raw,
}

impl UnitScale {
    /// Picks a scale from the largest value to display.
    #[must_use]
    pub fn auto(max_value: f64) -> Self {
        if max_value >= 1e9 {
            Self::Billions
        } else if max_value >= 1e6 {
            Self::Millions
        } else {
            Self::Raw
        }
    }

    /// Divisor applied to raw values.
    #[must_use]
    pub const fn divisor(&self) -> f64 {
        match self {
            Self::Billions => 1e9,
            Self::Millions => 1e6,
            Self::Raw => 1.0,
        }
    }

    /// Axis label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Billions => "USD (Billions)",
            Self::Millions => "USD (Millions)",
            Self::Raw => "USD ($)",
        }
    }

    /// Formats a raw dollar amount in this scale.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Billions => format!("{:.1}B", value / 1e9),
            Self::Millions => format!("{:.0}M", value / 1e6),
            Self::Raw => format!("{}", value.trunc() as i64),
        }
    }
}

impl fmt::Display for UnitScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Billions => "B",
            Self::Millions => "M",
            Self::Raw => "raw",
        })
    }
}

/// A requested scale: fixed, or chosen from the data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitChoice {
    /// Choose with [`UnitScale::auto`].
    #[default]
    Auto,
    /// Always use this scale.
    Fixed(UnitScale),
}

impl UnitChoice {
    /// Resolves the choice against the values about to be displayed.
    #[must_use]
    pub fn resolve(&self, values: &[f64]) -> UnitScale {
        match self {
            Self::Fixed(scale) => *scale,
            Self::Auto => UnitScale::auto(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        }
    }
}

impl FromStr for UnitChoice {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "B" => Ok(Self::Fixed(UnitScale::Billions)),
            "M" => Ok(Self::Fixed(UnitScale::Millions)),
            "raw" => Ok(Self::Fixed(UnitScale::Raw)),
            other => Err(DataError::InvalidParameter(format!(
                "unit must be one of: 'auto', 'M', 'B', or 'raw' (got {other:?})"
            ))),
        }
    }
}
