#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```no_run
//! use fundview::{EdgarProvider, FundamentalsService, Symbol, YahooProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = FundamentalsService::new(Arc::new(EdgarProvider::new(
//!         "MyApp/1.0 (contact@example.com)",
//!     )))
//!     .with_prices(Arc::new(YahooProvider::new()));
//!
//!     let report = service.report(&Symbol::new("AAPL")).await;
//!     println!("{:?}", report.net_income.growth.rates());
//! }
//! ```

// Core types and traits
pub use fundview_core::*;

// Calculations
pub use fundview_fundamentals::{
    ConceptSeries, ConceptSet, DIVIDENDS, NET_INCOME, PriceSummary, SeriesSummary, UnitChoice,
    UnitScale, extract_annual, growth, growth_rate, is_annual_frame,
};

// Providers
#[cfg(feature = "edgar")]
pub use fundview_edgar::{CikDirectory, EdgarProvider};
#[cfg(feature = "yahoo")]
pub use fundview_yahoo::YahooProvider;

mod service;
pub use service::{
    CompanyReport, FundamentalsService, PricePoint, PriceQuery, PriceReport, Section,
};
