//! Reference index of listed companies
//!
//! Immutable (ticker, company_name, sector) table built once at startup
//! by the data-loading collaborator and shared read-only by every
//! extraction call.

use crate::table::DataTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One row of the reference index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    pub ticker: String,
    pub company_name: String,
    pub sector: String,
}

/// Lookup structures for fast entity matching. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    ticker_to_company: HashMap<String, String>,
    company_names: Vec<String>,
    name_to_ticker: HashMap<String, String>,
    sectors: Vec<String>,
}

impl ReferenceIndex {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        let mut index = Self::default();

        for entry in entries {
            index
                .ticker_to_company
                .insert(entry.ticker.clone(), entry.company_name.clone());
            index
                .name_to_ticker
                .insert(entry.company_name.to_lowercase(), entry.ticker);
            if !index.company_names.contains(&entry.company_name) {
                index.company_names.push(entry.company_name);
            }
            if !index.sectors.contains(&entry.sector) {
                index.sectors.push(entry.sector);
            }
        }

        debug!(
            tickers = index.ticker_to_company.len(),
            companies = index.company_names.len(),
            sectors = index.sectors.len(),
            "Built reference index"
        );

        index
    }

    /// Build from a table carrying `ticker`, `company_name` and `sector`
    /// columns. Rows missing any of the three are skipped.
    pub fn from_table(table: &DataTable) -> Self {
        let entries = table
            .rows()
            .iter()
            .filter_map(|row| {
                Some(IndexEntry {
                    ticker: row.get("ticker")?.as_str()?.to_string(),
                    company_name: row.get("company_name")?.as_str()?.to_string(),
                    sector: row.get("sector")?.as_str()?.to_string(),
                })
            })
            .collect();
        Self::new(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.ticker_to_company.is_empty()
    }

    pub fn company_for_ticker(&self, ticker: &str) -> Option<&str> {
        self.ticker_to_company.get(ticker).map(String::as_str)
    }

    pub fn ticker_for_company(&self, company_name: &str) -> Option<&str> {
        self.name_to_ticker
            .get(&company_name.to_lowercase())
            .map(String::as_str)
    }

    /// Company names in first-seen order.
    pub fn company_names(&self) -> &[String] {
        &self.company_names
    }

    /// Unique sector names in first-seen order.
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_index() -> ReferenceIndex {
        ReferenceIndex::new(vec![
            IndexEntry {
                ticker: "2222".into(),
                company_name: "Saudi Aramco".into(),
                sector: "Energy".into(),
            },
            IndexEntry {
                ticker: "1010".into(),
                company_name: "Riyad Bank".into(),
                sector: "Financials".into(),
            },
            IndexEntry {
                ticker: "2050".into(),
                company_name: "Savola Group".into(),
                sector: "Consumer Staples".into(),
            },
        ])
    }

    #[test]
    fn test_lookup_maps() {
        let index = sample_index();
        assert_eq!(index.company_for_ticker("2222"), Some("Saudi Aramco"));
        assert_eq!(index.company_for_ticker("9999"), None);
        assert_eq!(index.ticker_for_company("riyad bank"), Some("1010"));
        assert_eq!(index.sectors(), ["Energy", "Financials", "Consumer Staples"]);
    }

    #[test]
    fn test_from_table_skips_incomplete_rows() {
        let table = DataTable::from_records(&json!([
            {"ticker": "2222", "company_name": "Saudi Aramco", "sector": "Energy"},
            {"ticker": "1111", "company_name": "No Sector Co"},
        ]));
        let index = ReferenceIndex::from_table(&table);
        assert_eq!(index.company_for_ticker("2222"), Some("Saudi Aramco"));
        assert_eq!(index.company_for_ticker("1111"), None);
        assert_eq!(index.company_names().len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index = ReferenceIndex::default();
        assert!(index.is_empty());
        assert!(index.company_names().is_empty());
    }
}
