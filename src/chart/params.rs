//! Chart Parameter Extractor
//!
//! Pulls years, top-N, metrics, sectors and companies out of a query.
//! Every extraction is independent and optional: the result is sparse.

use crate::models::{ChartParameters, Metric};
use crate::table::DataTable;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"\b(20\d{2})\b").expect("valid year regex");
    static ref TOP_N_RE: Regex = Regex::new(r"top\s+(\d+)").expect("valid top-n regex");
}

/// Metric keyword table; any keyword hit adds its canonical metric.
const METRIC_KEYWORDS: &[(Metric, &[&str])] = &[
    (Metric::Revenue, &["revenue", "sales", "top line"]),
    (Metric::NetProfit, &["net profit", "net income", "bottom line", "earnings"]),
    (Metric::GrossProfit, &["gross profit", "gross margin"]),
    (Metric::Roe, &["roe", "return on equity"]),
    (Metric::Roa, &["roa", "return on assets"]),
    (Metric::DebtToEquity, &["debt to equity", "leverage", "d/e"]),
];

/// Sector name substrings recognized in chart queries.
const SECTOR_NAMES: &[&str] = &[
    "banks",
    "petrochemicals",
    "retail",
    "real estate",
    "telecom",
    "healthcare",
    "insurance",
    "energy",
    "materials",
    "utilities",
];

/// Extract chart construction parameters from a query, optionally using
/// the data's `company_name` column for company detection.
///
/// Company matching here is a deliberately weaker heuristic than the
/// entity extractor's fuzzy matching (full-name substring or either of
/// the first two name words); the two are intentionally not unified.
pub fn extract_chart_parameters(query: &str, table: Option<&DataTable>) -> ChartParameters {
    let query_lower = query.to_lowercase();
    let mut params = ChartParameters::default();

    // Companies, only when tabular context is supplied
    if let Some(table) = table.filter(|t| t.has_column("company_name")) {
        for company in table.distinct_strings("company_name") {
            let company_lower = company.to_lowercase();
            let word_hit = company_lower
                .split_whitespace()
                .take(2)
                .any(|word| query_lower.contains(word));

            if query_lower.contains(&company_lower) || word_hit {
                params.companies.push(company);
            }
        }
    }

    // Years
    for caps in YEAR_RE.captures_iter(query) {
        if let Ok(year) = caps[1].parse::<i32>() {
            params.years.push(year);
        }
    }

    // Sectors
    for sector in SECTOR_NAMES {
        if query_lower.contains(sector) {
            params.sectors.push(title_case(sector));
        }
    }

    // Metrics
    for (metric, keywords) in METRIC_KEYWORDS {
        if keywords.iter().any(|kw| query_lower.contains(kw)) {
            params.metrics.push(*metric);
        }
    }

    // Top N
    if let Some(caps) = TOP_N_RE.captures(&query_lower) {
        params.top_n = caps[1].parse().ok();
    }

    params
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
