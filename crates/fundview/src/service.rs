//! Fetch, extract and compute in one call per ticker.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use fundview_core::{
    DataError, FactsProvider, FinancialFacts, GrowthSeries, PriceBar, PriceField, PriceProvider,
    Result, Symbol,
};
use fundview_fundamentals::{
    ConceptSeries, ConceptSet, DIVIDENDS, NET_INCOME, PriceSummary, SeriesSummary, extract_set,
    growth,
};

/// Default look-back for price history when no start date is given.
const DEFAULT_PRICE_YEARS: i64 = 10;

/// One line item (net income, dividends) with its growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Short name of the line item.
    pub name: String,
    /// Extracted annual figures, `None` if no candidate concept was reported.
    pub data: Option<ConceptSeries>,
    /// Growth parallel to the annual figures.
    pub growth: GrowthSeries,
    /// Headline statistics, `None` when there is no data.
    pub summary: Option<SeriesSummary>,
}

impl Section {
    fn build(facts: &FinancialFacts, set: &ConceptSet) -> Self {
        let data = extract_set(facts, set);
        let growth = data.as_ref().map(|d| growth(&d.series)).unwrap_or_default();
        let summary = data
            .as_ref()
            .and_then(|d| SeriesSummary::new(&d.series, &growth));

        Self {
            name: set.name.to_string(),
            data,
            growth,
            summary,
        }
    }

    /// Returns true if there are no annual figures to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.as_ref().is_none_or(|d| d.series.is_empty())
    }

    /// Convert the section into a DataFrame with columns `year, end, value, growth`.
    ///
    /// Undefined growth is null.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let records = self.data.as_ref().map(|d| d.series.records()).unwrap_or(&[]);
        let epoch = NaiveDate::default();

        let end = Series::new(
            "end".into(),
            records
                .iter()
                .map(|r| (r.date - epoch).num_days() as i32)
                .collect::<Vec<_>>(),
        )
        .cast(&DataType::Date)
        .map_err(|e| DataError::Other(e.to_string()))?;

        DataFrame::new(vec![
            Column::new("year".into(), records.iter().map(|r| r.year).collect::<Vec<_>>()),
            end.into_column(),
            Column::new("value".into(), records.iter().map(|r| r.value).collect::<Vec<_>>()),
            Column::new("growth".into(), self.growth.rates()),
        ])
        .map_err(|e| DataError::Other(e.to_string()))
    }
}

/// Fundamentals for one company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyReport {
    /// Ticker requested.
    pub symbol: Symbol,
    /// Net income section.
    pub net_income: Section,
    /// Dividends section.
    pub dividends: Section,
    /// Why the report is empty, when facts could not be obtained.
    pub note: Option<String>,
}

impl CompanyReport {
    /// Builds a report from already fetched facts.
    #[must_use]
    pub fn from_facts(symbol: Symbol, facts: &FinancialFacts) -> Self {
        Self {
            symbol,
            net_income: Section::build(facts, &NET_INCOME),
            dividends: Section::build(facts, &DIVIDENDS),
            note: None,
        }
    }

    /// Stacks both sections into one DataFrame with columns
    /// `symbol, item, year, end, value, growth`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame: Option<DataFrame> = None;
        for section in [&self.net_income, &self.dividends] {
            let mut df = section.to_frame()?;
            let height = df.height();
            df.insert_column(0, Column::new("item".into(), vec![section.name.as_str(); height]))
                .and_then(|df| {
                    df.insert_column(
                        0,
                        Column::new("symbol".into(), vec![self.symbol.as_str(); height]),
                    )
                })
                .map_err(|e| DataError::Other(e.to_string()))?;

            frame = Some(match frame.take() {
                Some(mut acc) => {
                    acc.vstack_mut(&df)
                        .map_err(|e| DataError::Other(e.to_string()))?;
                    acc
                }
                None => df,
            });
        }
        Ok(frame.unwrap_or_default())
    }
}

/// Date range and column for a price request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceQuery {
    /// First date to include; defaults to ten years before `end`.
    pub start: Option<NaiveDate>,
    /// Last date to include; defaults to today.
    pub end: Option<NaiveDate>,
    /// Column to chart.
    pub field: PriceField,
}

/// One point of a price column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Value of the selected column.
    pub value: f64,
}

/// Price history for one column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    /// Ticker requested.
    pub symbol: Symbol,
    /// Column selected.
    pub field: PriceField,
    /// Days with a value for the column.
    pub points: Vec<PricePoint>,
    /// Headline statistics, `None` when no day has a value.
    pub summary: Option<PriceSummary>,
}

impl PriceReport {
    /// Convert the points into a DataFrame with columns `symbol, date, <field>`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let epoch = NaiveDate::default();
        let date = Series::new(
            "date".into(),
            self.points
                .iter()
                .map(|p| (p.date - epoch).num_days() as i32)
                .collect::<Vec<_>>(),
        )
        .cast(&DataType::Date)
        .map_err(|e| DataError::Other(e.to_string()))?;

        DataFrame::new(vec![
            Column::new("symbol".into(), vec![self.symbol.as_str(); self.points.len()]),
            date.into_column(),
            Column::new(
                self.field.as_str().into(),
                self.points.iter().map(|p| p.value).collect::<Vec<_>>(),
            ),
        ])
        .map_err(|e| DataError::Other(e.to_string()))
    }
}

/// Runs the fetch, extract and compute cycle against configured providers.
#[derive(Clone)]
pub struct FundamentalsService {
    facts: Arc<dyn FactsProvider>,
    prices: Option<Arc<dyn PriceProvider>>,
}

impl std::fmt::Debug for FundamentalsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundamentalsService")
            .field("facts", &self.facts.name())
            .field("prices", &self.prices.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl FundamentalsService {
    /// Create a service over a facts provider.
    #[must_use]
    pub fn new(facts: Arc<dyn FactsProvider>) -> Self {
        debug!(provider = facts.name(), "Registering facts provider");
        Self {
            facts,
            prices: None,
        }
    }

    /// Set the price provider.
    #[must_use]
    pub fn with_prices(mut self, prices: Arc<dyn PriceProvider>) -> Self {
        debug!(provider = prices.name(), "Registering price provider");
        self.prices = Some(prices);
        self
    }

    /// Build the fundamentals report for `symbol`.
    ///
    /// Never fails: an unknown ticker or an unreachable facts service yields
    /// empty sections and a note explaining why.
    #[instrument(skip_all, fields(symbol = %symbol))]
    pub async fn report(&self, symbol: &Symbol) -> CompanyReport {
        let (facts, note) = match self.facts.company_facts(symbol).await {
            Ok(facts) => (facts, None),
            Err(DataError::SymbolNotFound(_)) => {
                info!("No CIK mapping for ticker");
                (
                    FinancialFacts::default(),
                    Some(format!("No company identifier known for {}", symbol)),
                )
            }
            Err(e) => {
                warn!(
                    provider = self.facts.name(),
                    error = %e,
                    "Facts unavailable, reporting no data"
                );
                (FinancialFacts::default(), Some(e.to_string()))
            }
        };

        let mut report = CompanyReport::from_facts(symbol.clone(), &facts);
        report.note = note;
        debug!(
            net_income_years = report.net_income.data.as_ref().map_or(0, |d| d.series.len()),
            dividend_years = report.dividends.data.as_ref().map_or(0, |d| d.series.len()),
            "Built report"
        );
        report
    }

    /// Fetch price history for `symbol` and select one column.
    #[instrument(skip_all, fields(symbol = %symbol))]
    pub async fn prices(&self, symbol: &Symbol, query: PriceQuery) -> Result<PriceReport> {
        let provider = self.prices.as_ref().ok_or_else(|| {
            DataError::InvalidParameter("No price provider configured".to_string())
        })?;

        let end = query.end.unwrap_or_else(|| Utc::now().date_naive());
        let start = query
            .start
            .unwrap_or_else(|| end - Duration::days(365 * DEFAULT_PRICE_YEARS));

        let bars = provider.price_history(symbol, start, end).await?;
        Ok(price_report(symbol.clone(), &bars, query.field))
    }
}

/// Selects `field` from `bars`, dropping days without a value.
fn price_report(symbol: Symbol, bars: &[PriceBar], field: PriceField) -> PriceReport {
    let points = bars
        .iter()
        .filter_map(|b| b.field(field).map(|value| PricePoint { date: b.date, value }))
        .collect();

    PriceReport {
        symbol,
        field,
        points,
        summary: PriceSummary::new(bars, field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fundview_core::DataProvider;
    use serde_json::json;

    #[derive(Debug)]
    struct StaticFacts(Result<FinancialFacts>);

    impl DataProvider for StaticFacts {
        fn name(&self) -> &str {
            "static"
        }

        fn description(&self) -> &str {
            "canned facts"
        }
    }

    #[async_trait]
    impl FactsProvider for StaticFacts {
        async fn company_facts(&self, symbol: &Symbol) -> Result<FinancialFacts> {
            match &self.0 {
                Ok(facts) => Ok(facts.clone()),
                Err(DataError::SymbolNotFound(_)) => {
                    Err(DataError::SymbolNotFound(symbol.to_string()))
                }
                Err(e) => Err(DataError::Network(e.to_string())),
            }
        }
    }

    #[derive(Debug)]
    struct StaticPrices(Vec<PriceBar>);

    impl DataProvider for StaticPrices {
        fn name(&self) -> &str {
            "static"
        }

        fn description(&self) -> &str {
            "canned prices"
        }
    }

    #[async_trait]
    impl PriceProvider for StaticPrices {
        async fn price_history(
            &self,
            _symbol: &Symbol,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<PriceBar>> {
            Ok(self
                .0
                .iter()
                .filter(|b| b.date >= start && b.date <= end)
                .cloned()
                .collect())
        }
    }

    fn sample_facts() -> FinancialFacts {
        serde_json::from_value(json!({
            "us-gaap": {
                "NetIncomeLoss": {
                    "label": "Net Income (Loss)",
                    "units": {"USD": [
                        {"end": "2021-12-31", "val": -1000, "frame": "CY2021"},
                        {"end": "2022-06-30", "val": 900, "frame": "CY2022Q2"},
                        {"end": "2022-12-31", "val": 3000, "frame": "CY2022"}
                    ]}
                }
            }
        }))
        .unwrap()
    }

    fn service(facts: Result<FinancialFacts>) -> FundamentalsService {
        FundamentalsService::new(Arc::new(StaticFacts(facts)))
    }

    #[tokio::test]
    async fn test_report_from_facts() {
        let report = service(Ok(sample_facts())).report(&Symbol::new("tsla")).await;

        assert_eq!(report.symbol.as_str(), "TSLA");
        assert!(report.note.is_none());
        assert!(!report.net_income.is_empty());
        assert_eq!(report.net_income.growth.rates(), vec![None, Some(400.0)]);
        assert_eq!(report.net_income.summary.as_ref().unwrap().negative_years, 1);

        assert!(report.dividends.is_empty());
        assert!(report.dividends.data.is_none());
        assert!(report.dividends.summary.is_none());
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_empty_report() {
        let svc = service(Err(DataError::SymbolNotFound(String::new())));
        let report = svc.report(&Symbol::new("ZZZZ")).await;

        assert!(report.net_income.is_empty());
        assert!(report.dividends.is_empty());
        assert!(report.note.unwrap().contains("ZZZZ"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_empty_report() {
        let svc = service(Err(DataError::Network("connection refused".to_string())));
        let report = svc.report(&Symbol::new("AAPL")).await;

        assert!(report.net_income.is_empty());
        assert!(report.note.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_prices_require_provider() {
        let err = service(Ok(FinancialFacts::default()))
            .prices(&Symbol::new("AAPL"), PriceQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_prices_select_column_and_range() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let bar = |date, close| PriceBar {
            date,
            open: Some(1.0),
            high: None,
            low: None,
            close,
            adjusted_close: None,
            volume: None,
        };
        let prices = StaticPrices(vec![
            bar(d(2), Some(100.0)),
            bar(d(3), None),
            bar(d(4), Some(105.0)),
            bar(d(5), Some(120.0)),
        ]);

        let svc = service(Ok(FinancialFacts::default())).with_prices(Arc::new(prices));
        let query = PriceQuery {
            start: Some(d(2)),
            end: Some(d(4)),
            field: PriceField::Close,
        };
        let report = svc.prices(&Symbol::new("AAPL"), query).await.unwrap();

        assert_eq!(report.points.len(), 2);
        assert_eq!(report.points[1], PricePoint { date: d(4), value: 105.0 });
        let summary = report.summary.unwrap();
        assert_eq!(summary.change, Some(5.0));
    }

    #[test]
    fn test_section_frame() {
        let report = CompanyReport::from_facts(Symbol::new("TSLA"), &sample_facts());

        let df = report.net_income.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 4);
        assert_eq!(df.column("growth").unwrap().null_count(), 1);
        assert_eq!(df.column("end").unwrap().dtype(), &DataType::Date);

        let empty = report.dividends.to_frame().unwrap();
        assert_eq!(empty.height(), 0);
    }

    #[test]
    fn test_company_frame_stacks_sections() {
        let mut facts = sample_facts();
        let dividends = serde_json::from_value(json!({
            "units": {"USD": [{"end": "2022-12-31", "val": 500, "frame": "CY2022"}]}
        }))
        .unwrap();
        facts.insert("us-gaap", "PaymentsOfDividends", dividends);

        let report = CompanyReport::from_facts(Symbol::new("TSLA"), &facts);
        let df = report.to_frame().unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 6);
        assert_eq!(df.get_column_index("symbol"), Some(0));
        assert_eq!(df.get_column_index("item"), Some(1));
        let items = df.column("item").unwrap().str().unwrap();
        assert_eq!(items.get(0), Some("net_income"));
        assert_eq!(items.get(2), Some("dividends"));
    }

    #[test]
    fn test_price_frame() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let report = PriceReport {
            symbol: Symbol::new("AAPL"),
            field: PriceField::AdjustedClose,
            points: vec![PricePoint { date, value: 184.73 }],
            summary: None,
        };

        let df = report.to_frame().unwrap();
        assert_eq!(df.shape(), (1, 3));
        assert!(df.column("adjusted_close").is_ok());
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }
}
