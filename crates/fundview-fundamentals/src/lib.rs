#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Annual fundamentals and growth.
//!
//! - [`extract_annual`] - Pick a concept and collect one figure per fiscal year
//! - [`growth`] - Sign-aware year-over-year growth
//! - [`UnitScale`] - Billions/millions/raw display scaling
//! - [`SeriesSummary`] / [`PriceSummary`] - Headline statistics
//!
//! # Example
//!
//! ```
//! use fundview_fundamentals::{annual_net_income, growth};
//!
//! let facts = serde_json::from_str(r#"{
//!     "us-gaap": { "NetIncomeLoss": { "units": { "USD": [
//!         {"end": "2021-12-31", "val": -1000, "frame": "CY2021"},
//!         {"end": "2022-12-31", "val": 3000, "frame": "CY2022"}
//!     ] } } }
//! }"#).unwrap();
//!
//! let net_income = annual_net_income(&facts).unwrap();
//! let rates = growth(&net_income.series).rates();
//! assert_eq!(rates, vec![None, Some(400.0)]);
//! ```

/// Annual figure extraction.
pub mod extract;
/// Year-over-year growth.
pub mod growth;
/// Summary statistics.
pub mod summary;
/// Display scaling for dollar amounts.
pub mod units;

pub use extract::{
    ANNUAL_FRAME_LEN, ConceptSeries, ConceptSet, DIVIDENDS, NET_INCOME, annual_dividends,
    annual_net_income, extract_annual, extract_set, is_annual_frame,
};
pub use growth::{growth, growth_rate};
pub use summary::{PriceSummary, SeriesSummary};
pub use units::{UnitChoice, UnitScale};
