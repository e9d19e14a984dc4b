#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for fundview.
//!
//! - [`FinancialFacts`](facts::FinancialFacts) - Raw XBRL company facts
//! - [`AnnualSeries`](types::AnnualSeries) / [`GrowthSeries`](types::GrowthSeries) - Derived yearly series
//! - [`PriceBar`](price::PriceBar) - Daily price history
//! - [`FactsProvider`](provider::FactsProvider) / [`PriceProvider`](provider::PriceProvider) - Data sources

/// Error types for data operations.
pub mod error;
/// Company facts data model.
pub mod facts;
/// Share-price types.
pub mod price;
/// Provider traits for fetching data.
pub mod provider;
/// Core data types (Symbol, Cik, annual and growth series).
pub mod types;

pub use error::{DataError, Result};
pub use facts::{Concept, FactReport, FinancialFacts, US_GAAP, USD};
pub use price::{PriceBar, PriceField};
pub use provider::{DataProvider, FactsProvider, PriceProvider};
pub use types::{AnnualRecord, AnnualSeries, Cik, GrowthPoint, GrowthSeries, Symbol};
