//! Year-over-year growth with a sign-aware formula.
//!
//! A plain percent change misreads a swing across zero: going from a loss of
//! 10 to a profit of 30 gives `(30 - -10) / -10 = -400%`. When the sign flips
//! the change is divided by the magnitude of the previous value instead, so
//! the same swing reads `+400%`.

use fundview_core::{AnnualSeries, GrowthPoint, GrowthSeries};

/// True for a loss followed by a profit or a profit followed by a loss.
///
/// Zero is neither, so a move to or from zero is not a crossing.
fn crosses_zero(previous: f64, current: f64) -> bool {
    (previous < 0.0 && current > 0.0) || (previous > 0.0 && current < 0.0)
}

/// Percent change from `previous` to `current`.
///
/// - `previous` undefined or zero: undefined.
/// - strict loss/profit crossing: `(current - previous) / |previous| * 100`.
/// - otherwise: `(current - previous) / previous * 100`.
///
/// Non-finite inputs count as undefined.
#[must_use]
pub fn growth_rate(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let previous = previous.filter(|p| p.is_finite())?;
    let current = current.filter(|c| c.is_finite())?;

    if previous == 0.0 {
        return None;
    }

    if crosses_zero(previous, current) {
        Some((current - previous) / previous.abs() * 100.0)
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Growth for each year of `series`; the first year is always undefined.
#[must_use]
pub fn growth(series: &AnnualSeries) -> GrowthSeries {
    let records = series.records();
    records
        .iter()
        .enumerate()
        .map(|(i, record)| GrowthPoint {
            year: record.year,
            rate: i
                .checked_sub(1)
                .and_then(|p| growth_rate(Some(records[p].value), Some(record.value))),
        })
        .collect()
}
