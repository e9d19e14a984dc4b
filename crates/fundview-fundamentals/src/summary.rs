//! Summary statistics shown next to the charts.

use chrono::NaiveDate;
use fundview_core::{AnnualSeries, GrowthSeries, PriceBar, PriceField};
use serde::{Deserialize, Serialize};

/// Summary of an annual series and its growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// First year covered.
    pub first_year: i32,
    /// Last year covered.
    pub last_year: i32,
    /// Value for the last year.
    pub latest: f64,
    /// Smallest yearly value.
    pub min: f64,
    /// Largest yearly value.
    pub max: f64,
    /// Growth for the last year, if defined.
    pub latest_growth: Option<f64>,
    /// Mean of the defined growth rates.
    pub mean_growth: Option<f64>,
    /// Number of years with a negative value.
    pub negative_years: usize,
}

impl SeriesSummary {
    /// Summarizes `series`; `None` for an empty series.
    #[must_use]
    pub fn new(series: &AnnualSeries, growth: &GrowthSeries) -> Option<Self> {
        let first = series.records().first()?;
        let last = series.last()?;

        let values = series.values();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let defined: Vec<f64> = growth.defined().collect();
        let mean_growth =
            (!defined.is_empty()).then(|| defined.iter().sum::<f64>() / defined.len() as f64);

        Some(Self {
            first_year: first.year,
            last_year: last.year,
            latest: last.value,
            min,
            max,
            latest_growth: growth.points().last().and_then(|p| p.rate),
            mean_growth,
            negative_years: values.iter().filter(|v| **v < 0.0).count(),
        })
    }
}

/// Summary of one price column over a date range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Column summarized.
    pub field: PriceField,
    /// First date with a value.
    pub start: NaiveDate,
    /// Last date with a value.
    pub end: NaiveDate,
    /// First value.
    pub first: f64,
    /// Last value.
    pub last: f64,
    /// Lowest value.
    pub min: f64,
    /// Highest value.
    pub max: f64,
    /// Percent change from first to last, undefined if the first value is zero.
    pub change: Option<f64>,
}

impl PriceSummary {
    /// Summarizes `field` over `bars`, skipping days without a value.
    ///
    /// Returns `None` if no bar has a value for `field`.
    #[must_use]
    pub fn new(bars: &[PriceBar], field: PriceField) -> Option<Self> {
        let points: Vec<(NaiveDate, f64)> = bars
            .iter()
            .filter_map(|b| b.field(field).map(|v| (b.date, v)))
            .collect();

        let &(start, first) = points.first()?;
        let &(end, last) = points.last()?;
        let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let change = (first != 0.0).then(|| (last - first) / first * 100.0);

        Some(Self {
            field,
            start,
            end,
            first,
            last,
            min,
            max,
            change,
        })
    }
}
