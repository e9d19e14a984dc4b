//! Core data types.
//!
//! - [`Symbol`] - Ticker symbol
//! - [`Cik`] - SEC Central Index Key
//! - [`AnnualRecord`] / [`AnnualSeries`] - One reported value per fiscal year
//! - [`GrowthPoint`] / [`GrowthSeries`] - Year-over-year growth, parallel to an annual series

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, Result};

/// A ticker symbol.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// SEC Central Index Key, stored zero-padded to ten digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cik(String);

impl Cik {
    /// Width of a padded CIK.
    pub const WIDTH: usize = 10;

    /// Parses a CIK from digits, padding with leading zeros.
    ///
    /// Accepts both `"320193"` and `"0000320193"`. Anything that is not one to
    /// ten ASCII digits is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > Self::WIDTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DataError::InvalidParameter(format!("Invalid CIK: {raw:?}")));
        }
        Ok(Self(format!("{:0>width$}", raw, width = Self::WIDTH)))
    }

    /// Builds a CIK from its numeric form.
    #[must_use]
    pub fn from_number(n: u64) -> Self {
        Self(format!("{:0>width$}", n, width = Self::WIDTH))
    }

    /// Returns the padded CIK.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cik {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cik {
    type Error = DataError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Cik> for String {
    fn from(cik: Cik) -> Self {
        cik.0
    }
}

/// One annual figure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    /// Calendar year of the period end date.
    pub year: i32,
    /// End date of the reporting period.
    pub date: NaiveDate,
    /// Reported value, signed.
    pub value: f64,
}

impl AnnualRecord {
    /// Creates a record, deriving the year from `date`.
    #[must_use]
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            year: date.year(),
            date,
            value,
        }
    }
}

/// Annual figures sorted ascending by year.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualSeries {
    records: Vec<AnnualRecord>,
}

impl AnnualSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Builds a series from unordered records, sorting them by year.
    ///
    /// The sort is stable, so records sharing a year keep their input order.
    #[must_use]
    pub fn from_records(mut records: Vec<AnnualRecord>) -> Self {
        records.sort_by_key(|r| r.year);
        Self { records }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn records(&self) -> &[AnnualRecord] {
        &self.records
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> impl Iterator<Item = &AnnualRecord> {
        self.records.iter()
    }

    /// Returns the values in year order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Returns the most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&AnnualRecord> {
        self.records.last()
    }
}

impl<'a> IntoIterator for &'a AnnualSeries {
    type Item = &'a AnnualRecord;
    type IntoIter = std::slice::Iter<'a, AnnualRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Growth for one year. `rate` is `None` when growth is undefined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Year the growth is reported for.
    pub year: i32,
    /// Percent change from the previous year.
    pub rate: Option<f64>,
}

/// Year-over-year growth, one point per record of the source series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowthSeries {
    points: Vec<GrowthPoint>,
}

impl GrowthSeries {
    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points as a slice.
    #[must_use]
    pub fn points(&self) -> &[GrowthPoint] {
        &self.points
    }

    /// Returns the growth rates in year order.
    #[must_use]
    pub fn rates(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.rate).collect()
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &GrowthPoint> {
        self.points.iter()
    }

    /// Returns only the defined rates.
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.rate)
    }
}

impl FromIterator<GrowthPoint> for GrowthSeries {
    fn from_iter<I: IntoIterator<Item = GrowthPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
