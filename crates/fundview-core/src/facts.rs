//! XBRL company facts as returned by the SEC EDGAR company-facts API.
//!
//! The shape is `namespace -> concept -> { label, description, units }`, with
//! `units` mapping a unit of measure such as `"USD"` to the raw disclosure
//! reports. Every report field is optional so one malformed entry never
//! rejects the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Taxonomy namespace for US GAAP concepts.
pub const US_GAAP: &str = "us-gaap";

/// Unit of measure for US dollar amounts.
pub const USD: &str = "USD";

/// A single disclosure report for a concept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactReport {
    /// End date of the reporting period, ISO 8601.
    #[serde(default, deserialize_with = "lenient")]
    pub end: Option<String>,
    /// Reported value.
    #[serde(default, deserialize_with = "lenient")]
    pub val: Option<f64>,
    /// Fiscal-period grouping, e.g. `CY2021` or `CY2021Q1`.
    #[serde(default, deserialize_with = "lenient")]
    pub frame: Option<String>,
    /// Fiscal year of the filing.
    #[serde(default, deserialize_with = "lenient")]
    pub fy: Option<i32>,
    /// Fiscal period of the filing, e.g. `FY` or `Q2`.
    #[serde(default, deserialize_with = "lenient")]
    pub fp: Option<String>,
    /// Form type, e.g. `10-K`.
    #[serde(default, deserialize_with = "lenient")]
    pub form: Option<String>,
    /// Date the filing was made.
    #[serde(default, deserialize_with = "lenient")]
    pub filed: Option<String>,
    /// Accession number.
    #[serde(default, deserialize_with = "lenient")]
    pub accn: Option<String>,
}

/// A financial concept with its reports grouped by unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Human-readable label.
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
    /// Long-form description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Reports keyed by unit of measure.
    #[serde(default, deserialize_with = "lenient_units")]
    pub units: HashMap<String, Vec<FactReport>>,
}

impl Concept {
    /// Returns the reports for `unit`, or an empty slice when the unit is absent.
    #[must_use]
    pub fn reports(&self, unit: &str) -> &[FactReport] {
        self.units.get(unit).map(Vec::as_slice).unwrap_or_default()
    }
}

/// All facts for one company, keyed by namespace then concept name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FinancialFacts {
    namespaces: HashMap<String, HashMap<String, Concept>>,
}

impl FinancialFacts {
    /// Creates facts from a namespace map.
    #[must_use]
    pub const fn new(namespaces: HashMap<String, HashMap<String, Concept>>) -> Self {
        Self { namespaces }
    }

    /// Returns true if no namespace carries any concept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.values().all(HashMap::is_empty)
    }

    /// Returns the concepts under `namespace`.
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&HashMap<String, Concept>> {
        self.namespaces.get(namespace)
    }

    /// Looks up a concept by namespace and name.
    #[must_use]
    pub fn concept(&self, namespace: &str, name: &str) -> Option<&Concept> {
        self.namespaces.get(namespace)?.get(name)
    }

    /// Inserts a concept, replacing any existing one with the same name.
    pub fn insert(&mut self, namespace: impl Into<String>, name: impl Into<String>, concept: Concept) {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .insert(name.into(), concept);
    }
}

impl<'de> Deserialize<'de> for FinancialFacts {
    /// Accepts either the bare `facts` object or the full company-facts
    /// envelope `{ "cik": .., "entityName": .., "facts": {..} }`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Envelope {
                facts: HashMap<String, serde_json::Value>,
            },
            Bare(HashMap<String, serde_json::Value>),
        }

        let (Shape::Envelope { facts } | Shape::Bare(facts)) = Shape::deserialize(deserializer)?;

        // Namespaces and concepts that are not objects are dropped one by one.
        let namespaces = facts
            .into_iter()
            .filter_map(|(namespace, concepts)| match concepts {
                serde_json::Value::Object(concepts) => Some((namespace, concepts)),
                _ => None,
            })
            .map(|(namespace, concepts)| {
                let concepts = concepts
                    .into_iter()
                    .filter_map(|(name, concept)| {
                        serde_json::from_value::<Concept>(concept)
                            .ok()
                            .map(|c| (name, c))
                    })
                    .collect();
                (namespace, concepts)
            })
            .collect();

        Ok(Self::new(namespaces))
    }
}

/// Deserializes the `units` map, skipping reports that are not objects and
/// units that are not arrays.
fn lenient_units<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<FactReport>>, D::Error>
where
    D: Deserializer<'de>,
{
    let units = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(units) => units,
        _ => return Ok(HashMap::new()),
    };

    Ok(units
        .into_iter()
        .filter_map(|(unit, reports)| match reports {
            serde_json::Value::Array(reports) => Some((unit, reports)),
            _ => None,
        })
        .map(|(unit, reports)| {
            let reports = reports
                .into_iter()
                .filter_map(|r| serde_json::from_value::<FactReport>(r).ok())
                .collect();
            (unit, reports)
        })
        .collect())
}

/// Deserializes a field as `None` when it has the wrong JSON type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
