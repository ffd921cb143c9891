//! Entity extraction against the reference index
//!
//! Finds tickers, company names (exact then fuzzy) and sectors in raw
//! query text. Matches are additive and never backtracked.

use crate::index::ReferenceIndex;
use crate::models::EntityBundle;
use lazy_static::lazy_static;
use regex::Regex;
use strsim::normalized_levenshtein;

lazy_static! {
    static ref TICKER_RE: Regex = Regex::new(r"\b(\d{4})\b").expect("valid ticker regex");
}

/// Company names shorter than this are matched by containment only;
/// fuzzy matching on very short names produces too many false hits.
const FUZZY_MIN_NAME_LEN: usize = 5;

/// Similarity ratio a fuzzy company match must exceed.
const FUZZY_THRESHOLD: f64 = 0.6;

/// Sector aliases mapped to canonical buckets, in fixed scan order.
/// The first alias hit per bucket wins.
const SECTOR_ALIASES: &[(&str, &[&str])] = &[
    ("financials", &["financial", "bank", "banking", "financials"]),
    ("insurance", &["insurance", "insurer"]),
    ("real estate", &["real estate", "property", "realestate"]),
    ("utilities", &["utility", "utilities", "power", "electric"]),
    ("consumer staples", &["consumer", "retail", "food", "consumer staples"]),
    ("other", &["other"]),
];

/// Extract tickers, company names and sectors from a query.
///
/// Empty query or empty index yields an empty bundle.
pub fn extract_entities(query: &str, index: &ReferenceIndex) -> EntityBundle {
    let mut entities = EntityBundle::default();

    if index.is_empty() {
        return entities;
    }

    let query_lower = query.to_lowercase();

    // 1. Tickers: 4-digit numbers that exist in the index. A matched
    //    ticker also contributes its company name.
    for caps in TICKER_RE.captures_iter(query) {
        let ticker = &caps[1];
        if let Some(company) = index.company_for_ticker(ticker) {
            entities.push_ticker(ticker);
            entities.push_company(company);
        }
    }

    // 2. Company names: exact containment first, fuzzy ratio for longer
    //    names. Containment-first ordering keeps decisions stable.
    for company in index.company_names() {
        if entities.companies.iter().any(|c| c == company) {
            continue;
        }

        let company_lower = company.to_lowercase();

        if query_lower.contains(&company_lower) {
            entities.push_company(company);
            continue;
        }

        if company_lower.len() > FUZZY_MIN_NAME_LEN
            && normalized_levenshtein(&company_lower, &query_lower) > FUZZY_THRESHOLD
        {
            entities.push_company(company);
        }
    }

    // 3. Sectors via the alias table, resolved to the actual sector
    //    string from the index when one contains the bucket name.
    for (bucket, aliases) in SECTOR_ALIASES {
        if !aliases.iter().any(|alias| query_lower.contains(alias)) {
            continue;
        }

        let resolved = index
            .sectors()
            .iter()
            .find(|actual| {
                let actual_lower = actual.to_lowercase();
                actual_lower == *bucket || actual_lower.contains(bucket)
            })
            .cloned()
            .unwrap_or_else(|| title_case(bucket));

        entities.push_sector(&resolved);
    }

    entities
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
