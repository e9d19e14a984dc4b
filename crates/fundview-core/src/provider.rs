//! Provider traits for fetching financial data.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FactsProvider`] - XBRL company facts (fundamentals)
//! - [`PriceProvider`] - Daily share-price history

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    error::Result,
    facts::FinancialFacts,
    price::PriceBar,
    types::Symbol,
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for company fundamentals.
#[async_trait]
pub trait FactsProvider: DataProvider {
    /// Fetches every reported fact for the company behind `symbol`.
    ///
    /// Returns [`DataError::SymbolNotFound`](crate::DataError::SymbolNotFound)
    /// when the symbol cannot be mapped to a company.
    async fn company_facts(&self, symbol: &Symbol) -> Result<FinancialFacts>;
}

/// Provider for daily share prices.
#[async_trait]
pub trait PriceProvider: DataProvider {
    /// Fetches daily bars for `symbol` between `start` and `end`, inclusive,
    /// sorted ascending by date.
    async fn price_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>>;
}
