//! Keyword Intent Classifier
//!
//! Maps a query to one of five intents via case-insensitive substring
//! containment. Buckets are checked in fixed priority order:
//! ranking > sector > timeseries > latest; the first bucket with any
//! hit wins. No hit across all four buckets means General.

use crate::models::Intent;

/// Static keyword lists — zero allocation
const RANKING_KEYWORDS: &[&str] = &[
    "top", "bottom", "best", "worst", "highest", "lowest", "rank",
    "biggest", "smallest", "largest", "most", "least", "leader",
];

const SECTOR_KEYWORDS: &[&str] = &[
    "sector", "industry", "compare sector", "benchmark",
    "by sector", "per sector", "sector average", "industry average",
];

const TIMESERIES_KEYWORDS: &[&str] = &[
    "growth", "trend", "yoy", "year over year", "change", "over time",
    "history", "historical", "years", "quarterly", "annual",
];

const LATEST_KEYWORDS: &[&str] = &[
    "latest", "current", "recent", "now", "today", "2024", "2025",
    "last quarter", "most recent", "q1", "q2", "q3", "q4",
];

/// Priority order is significant: a query containing keywords from two
/// buckets resolves to the earlier one.
const INTENT_PRIORITY: &[(Intent, &[&str])] = &[
    (Intent::Ranking, RANKING_KEYWORDS),
    (Intent::Sector, SECTOR_KEYWORDS),
    (Intent::Timeseries, TIMESERIES_KEYWORDS),
    (Intent::Latest, LATEST_KEYWORDS),
];

/// Keyword-based intent classifier
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a query into an intent by first-match priority scan.
    pub fn classify(query: &str) -> Intent {
        let query_lower = query.to_lowercase();

        for (intent, keywords) in INTENT_PRIORITY {
            if keywords.iter().any(|kw| query_lower.contains(kw)) {
                return *intent;
            }
        }

        Intent::General
    }
}
