//! Annual figure extraction from company facts.
//!
//! A concept is picked from an ordered candidate list, then every USD report
//! tagged with an annual frame contributes one `(end date, value)` pair.

use chrono::NaiveDate;
use fundview_core::{AnnualRecord, AnnualSeries, FinancialFacts, US_GAAP, USD};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Length of a calendar-year frame tag such as `CY2021`.
///
/// Quarterly and instant frames (`CY2021Q1`, `CY2021Q4I`) are longer.
pub const ANNUAL_FRAME_LEN: usize = 6;

/// Returns true if `frame` tags a full-year figure.
#[must_use]
pub fn is_annual_frame(frame: &str) -> bool {
    frame.chars().count() == ANNUAL_FRAME_LEN
}

/// An ordered list of concept names that report the same line item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConceptSet {
    /// Short name for the line item, e.g. `net_income`.
    pub name: &'static str,
    /// Concept names in priority order.
    pub candidates: &'static [&'static str],
}

/// Net income, preferring the figure available to common stockholders.
pub const NET_INCOME: ConceptSet = ConceptSet {
    name: "net_income",
    candidates: &[
        "NetIncomeLossAvailableToCommonStockholdersBasic",
        "NetIncomeLoss",
    ],
};

/// Dividends paid.
pub const DIVIDENDS: ConceptSet = ConceptSet {
    name: "dividends",
    candidates: &[
        "PaymentsOfDividends",
        "PaymentsOfDividendsCommonStock",
        "PaymentsOfDividendsPreferredStock",
    ],
};

/// Annual figures for the concept that was selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptSeries {
    /// Name of the selected concept.
    pub concept: String,
    /// Concept label, empty if the source has none.
    pub label: String,
    /// Concept description, empty if the source has none.
    pub description: String,
    /// Annual figures sorted by year.
    pub series: AnnualSeries,
}

/// Extracts annual figures for the first of `candidates` present under `us-gaap`.
///
/// Returns `None` when no candidate is present. A present concept without USD
/// reports yields an empty series. Reports without an annual frame, an end
/// date or a value are skipped.
#[must_use]
pub fn extract_annual(facts: &FinancialFacts, candidates: &[&str]) -> Option<ConceptSeries> {
    let namespace = facts.namespace(US_GAAP)?;
    let (name, concept) = candidates
        .iter()
        .find_map(|name| namespace.get(*name).map(|c| (*name, c)))?;

    let reports = concept.reports(USD);
    let records: Vec<AnnualRecord> = reports
        .iter()
        .filter(|r| r.frame.as_deref().is_some_and(is_annual_frame))
        .filter_map(|r| {
            let date = NaiveDate::parse_from_str(r.end.as_deref()?, "%Y-%m-%d").ok()?;
            Some(AnnualRecord::new(date, r.val?))
        })
        .collect();

    debug!(
        concept = name,
        reports = reports.len(),
        annual = records.len(),
        "Extracted annual figures"
    );

    Some(ConceptSeries {
        concept: name.to_string(),
        label: concept.label.clone().unwrap_or_default(),
        description: concept.description.clone().unwrap_or_default(),
        series: AnnualSeries::from_records(records),
    })
}

/// Extracts annual figures for a named [`ConceptSet`].
#[must_use]
pub fn extract_set(facts: &FinancialFacts, set: &ConceptSet) -> Option<ConceptSeries> {
    extract_annual(facts, set.candidates)
}

/// Annual net income.
#[must_use]
pub fn annual_net_income(facts: &FinancialFacts) -> Option<ConceptSeries> {
    extract_set(facts, &NET_INCOME)
}

/// Annual dividends paid.
#[must_use]
pub fn annual_dividends(facts: &FinancialFacts) -> Option<ConceptSeries> {
    extract_set(facts, &DIVIDENDS)
}
