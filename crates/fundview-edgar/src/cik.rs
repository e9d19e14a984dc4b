//! Ticker to CIK lookup table.

use fundview_core::{Cik, DataError, Result, Symbol};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Tickers known without a network lookup.
const BUILTIN: &[(&str, &str)] = &[
    ("AAPL", "0000320193"),
    ("ADBE", "0000796343"),
    ("AMD", "0000002488"),
    ("AMZN", "0001018724"),
    ("BRK-B", "0001067983"),
    ("CPNG", "0001834584"),
    ("FB", "0001326801"),
    ("GOOG", "0001652044"),
    ("GOOGL", "0001652044"),
    ("INTC", "0000050863"),
    ("KO", "0000021344"),
    ("LOGI", "0001032975"),
    ("MA", "0001141391"),
    ("MSFT", "0000789019"),
    ("MMM", "0000066740"),
    ("NFLX", "0001065280"),
    ("NVDA", "0001045810"),
    ("PEP", "0000077476"),
    ("SBUX", "0000829224"),
    ("TSLA", "0001318605"),
    ("V", "0001403161"),
];

/// Static ticker to CIK mapping.
///
/// Stored on disk as a flat JSON object, e.g. `{"AAPL": "0000320193"}`. CIKs
/// may be strings or numbers and are zero-padded on load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CikDirectory {
    entries: BTreeMap<Symbol, Cik>,
}

impl CikDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the built-in tickers.
    #[must_use]
    pub fn builtin() -> Self {
        let mut dir = Self::new();
        for (ticker, cik) in BUILTIN {
            if let Ok(cik) = Cik::parse(cik) {
                dir.insert(Symbol::new(*ticker), cik);
            }
        }
        dir
    }

    /// Parses a directory from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| DataError::Parse(format!("Invalid CIK table: {}", e)))?;

        let mut dir = Self::new();
        for (ticker, value) in raw {
            let cik = match &value {
                serde_json::Value::String(s) => Cik::parse(s)?,
                serde_json::Value::Number(n) => n
                    .as_u64()
                    .map(Cik::from_number)
                    .ok_or_else(|| DataError::Parse(format!("Invalid CIK for {}: {}", ticker, n)))?,
                other => {
                    return Err(DataError::Parse(format!(
                        "Invalid CIK for {}: {}",
                        ticker, other
                    )));
                }
            };
            dir.insert(Symbol::new(ticker), cik);
        }
        Ok(dir)
    }

    /// Reads a directory from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("{}: {}", path.display(), e)))?;
        let dir = Self::from_json_str(&json)?;
        debug!(path = %path.display(), entries = dir.len(), "Loaded CIK table");
        Ok(dir)
    }

    /// Adds or replaces a mapping.
    pub fn insert(&mut self, symbol: Symbol, cik: Cik) {
        self.entries.insert(symbol, cik);
    }

    /// Copies every entry of `other` over this directory.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Looks up the CIK for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&Cik> {
        self.entries.get(symbol)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Cik)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() {
        let dir = CikDirectory::builtin();
        assert_eq!(dir.len(), BUILTIN.len());
        assert_eq!(dir.get(&Symbol::new("aapl")).unwrap().as_str(), "0000320193");
        assert_eq!(
            dir.get(&Symbol::new("GOOG")),
            dir.get(&Symbol::new("GOOGL"))
        );
        assert!(dir.get(&Symbol::new("ZZZZ")).is_none());
    }

    #[test]
    fn test_from_json() {
        let dir = CikDirectory::from_json_str(r#"{"orcl": "1341439", "IBM": 51143}"#).unwrap();
        assert_eq!(dir.get(&Symbol::new("ORCL")).unwrap().as_str(), "0001341439");
        assert_eq!(dir.get(&Symbol::new("IBM")).unwrap().as_str(), "0000051143");
    }

    #[test]
    fn test_from_json_rejects_bad_entries() {
        assert!(CikDirectory::from_json_str(r#"{"ORCL": "abc"}"#).is_err());
        assert!(CikDirectory::from_json_str(r#"{"ORCL": [1]}"#).is_err());
        assert!(CikDirectory::from_json_str("[]").is_err());
    }

    #[test]
    fn test_merged_overrides() {
        let file = CikDirectory::from_json_str(r#"{"AAPL": "1", "ORCL": "1341439"}"#).unwrap();
        let dir = CikDirectory::builtin().merged(file);
        assert_eq!(dir.get(&Symbol::new("AAPL")).unwrap().as_str(), "0000000001");
        assert_eq!(dir.len(), BUILTIN.len() + 1);
    }

    #[test]
    fn test_from_missing_file() {
        let err = CikDirectory::from_file("/nonexistent/ciks.json").unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
