#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundview/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR company facts provider.
//!
//! This crate provides access to the EDGAR XBRL API:
//!
//! - Ticker to CIK (Central Index Key) mapping from a local table
//! - Optional CIK lookup from the SEC ticker listing
//! - Company facts from the `companyfacts` endpoint
//!
//! # Example
//!
//! ```no_run
//! use fundview_edgar::{CikDirectory, EdgarProvider};
//! use fundview_core::{FactsProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)")
//!         .with_directory(CikDirectory::builtin());
//!
//!     let facts = provider.company_facts(&Symbol::new("AAPL")).await?;
//!     println!("us-gaap concepts: {:?}", facts.namespace("us-gaap").map(|n| n.len()));
//!
//!     Ok(())
//! }
//! ```

mod cik;

pub use cik::CikDirectory;

use async_trait::async_trait;
use fundview_core::{
    Cik, DataError, DataProvider, FactsProvider, FinancialFacts, Result, Symbol,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    const fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// SEC EDGAR data provider.
///
/// Resolves tickers through a [`CikDirectory`] and fetches XBRL company facts.
/// Requests are spaced at least 100ms apart per SEC requirements.
#[derive(Debug)]
pub struct EdgarProvider {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    directory: CikDirectory,
    remote_lookup: bool,
    base_url: String,
}

impl EdgarProvider {
    /// Create a new EDGAR provider with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// The provider starts with the built-in ticker table and remote lookup disabled.
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client)
    }

    /// Create a new EDGAR provider with a custom HTTP client.
    ///
    /// The client must already carry an identifying user agent.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            directory: CikDirectory::builtin(),
            remote_lookup: false,
            base_url: EDGAR_BASE_URL.to_string(),
        }
    }

    /// Replace the ticker table.
    #[must_use]
    pub fn with_directory(mut self, directory: CikDirectory) -> Self {
        self.directory = directory;
        self
    }

    /// Fall back to the SEC ticker listing for tickers missing from the table.
    #[must_use]
    pub fn with_remote_lookup(mut self, enabled: bool) -> Self {
        self.remote_lookup = enabled;
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the ticker table.
    #[must_use]
    pub const fn directory(&self) -> &CikDirectory {
        &self.directory
    }

    /// Resolve a ticker to its CIK.
    ///
    /// Checks the local table first, then the SEC ticker listing if remote
    /// lookup is enabled.
    pub async fn resolve_cik(&self, symbol: &Symbol) -> Result<Cik> {
        if symbol.as_str().is_empty() {
            return Err(DataError::InvalidParameter("Empty ticker".to_string()));
        }

        if let Some(cik) = self.directory.get(symbol) {
            return Ok(cik.clone());
        }

        if self.remote_lookup {
            return self.lookup_cik_remote(symbol).await;
        }

        Err(DataError::SymbolNotFound(symbol.to_string()))
    }

    /// Look up a company's CIK from the SEC ticker listing.
    async fn lookup_cik_remote(&self, symbol: &Symbol) -> Result<Cik> {
        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching company tickers from SEC");
        let response = self
            .client
            .get(COMPANY_TICKERS_URL)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DataError::Network(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyTickerInfo> = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("Failed to parse company tickers: {}", e)))?;

        find_ticker(&data, symbol).ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    /// Fetch company facts for a CIK.
    #[instrument(skip_all, fields(cik = %cik))]
    pub async fn fetch_company_facts(&self, cik: &Cik) -> Result<FinancialFacts> {
        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/api/xbrl/companyfacts/CIK{}.json", self.base_url, cik);

        debug!("Fetching company facts from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: self.name().to_string(),
                retry_after: Some(Duration::from_secs(10)),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(format!("CIK{}", cik)));
        }

        if !response.status().is_success() {
            return Err(DataError::Network(format!(
                "Failed to fetch company facts for CIK {}: HTTP {}",
                cik,
                response.status()
            )));
        }

        let facts: FinancialFacts = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("Failed to parse company facts: {}", e)))?;

        Ok(facts)
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR XBRL company facts from 10-K and 10-Q filings"
    }
}

#[async_trait]
impl FactsProvider for EdgarProvider {
    async fn company_facts(&self, symbol: &Symbol) -> Result<FinancialFacts> {
        let cik = self.resolve_cik(symbol).await?;
        debug!(symbol = %symbol, cik = %cik, "Resolved CIK");
        self.fetch_company_facts(&cik).await
    }
}

/// Finds `symbol` in the SEC ticker listing.
fn find_ticker(data: &HashMap<String, CompanyTickerInfo>, symbol: &Symbol) -> Option<Cik> {
    data.values()
        .find(|company| company.ticker.eq_ignore_ascii_case(symbol.as_str()))
        .map(|company| Cik::from_number(company.cik_str))
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_traits() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)");

        assert_eq!(provider.name(), "SEC EDGAR");
        assert!(!provider.description().is_empty());
        assert!(!provider.directory().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_from_directory() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)");

        let cik = provider.resolve_cik(&Symbol::new("msft")).await.unwrap();
        assert_eq!(cik.as_str(), "0000789019");
    }

    #[tokio::test]
    async fn test_unknown_ticker_without_remote_lookup() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)")
            .with_directory(CikDirectory::new());

        let err = provider.resolve_cik(&Symbol::new("AAPL")).await.unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(s) if s == "AAPL"));

        let err = provider.company_facts(&Symbol::new("AAPL")).await.unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_ticker() {
        let provider = EdgarProvider::new("Test/1.0 (test@example.com)");
        let err = provider.resolve_cik(&Symbol::new("  ")).await.unwrap_err();
        assert!(matches!(err, DataError::InvalidParameter(_)));
    }

    #[test]
    fn test_find_ticker_in_listing() {
        let listing: HashMap<String, CompanyTickerInfo> = serde_json::from_str(
            r#"{
                "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
                "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
            }"#,
        )
        .unwrap();

        let cik = find_ticker(&listing, &Symbol::new("msft")).unwrap();
        assert_eq!(cik.as_str(), "0000789019");
        assert!(find_ticker(&listing, &Symbol::new("NVDA")).is_none());
    }

    #[test]
    fn test_base_url_trimmed() {
        let provider =
            EdgarProvider::new("Test/1.0 (test@example.com)").with_base_url("http://localhost:8080/");
        assert_eq!(provider.base_url, "http://localhost:8080");
    }
}
