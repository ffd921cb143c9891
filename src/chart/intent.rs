//! Chart Intent Detector
//!
//! Decides whether a query asks for a chart and which type. Unlike the
//! intent classifier's first-match scan, the chart type is whichever
//! type accumulates the most matched keywords; earlier table entries
//! win ties.

use crate::models::{ChartIntent, ChartType};

/// Words that make a chart request explicit regardless of type.
const EXPLICIT_CHART_WORDS: &[&str] = &[
    "chart",
    "graph",
    "plot",
    "visualize",
    "visualization",
    "show me a",
    "display",
];

/// Keyword table per chart type, in fixed order.
const CHART_KEYWORDS: &[(ChartType, &[&str])] = &[
    (
        ChartType::Waterfall,
        &["waterfall", "income statement breakdown", "profit breakdown", "revenue to profit"],
    ),
    (
        ChartType::BalanceSheet,
        &["balance sheet", "assets liabilities", "asset composition", "financial position"],
    ),
    (
        ChartType::Radar,
        &["radar", "ratio profile", "financial health", "company profile"],
    ),
    (
        ChartType::BarComparison,
        &["compare", "comparison", "vs", "versus", "top companies", "ranking"],
    ),
    (
        ChartType::Trend,
        &["trend", "over time", "historical", "growth", "multi-year", "timeline"],
    ),
    (
        ChartType::Yoy,
        &["year over year", "yoy", "annual comparison", "yearly change"],
    ),
    (
        ChartType::Sunburst,
        &["sunburst", "market composition", "sector breakdown", "hierarchical"],
    ),
    (
        ChartType::Heatmap,
        &["heatmap", "sector performance", "correlation", "matrix"],
    ),
    (
        ChartType::Scatter,
        &["scatter", "risk return", "quadrant", "distribution"],
    ),
    (
        ChartType::Dashboard,
        &["dashboard", "overview", "summary", "kpi", "metrics"],
    ),
    (ChartType::Pie, &["pie", "distribution", "share", "proportion"]),
    (ChartType::Line, &["line", "series", "progression"]),
];

/// Detect whether a query wants a chart, and of which type.
pub fn detect_chart_intent(query: &str) -> ChartIntent {
    let query_lower = query.to_lowercase();

    let has_explicit_request = EXPLICIT_CHART_WORDS
        .iter()
        .any(|word| query_lower.contains(word));

    let mut intent = ChartIntent::none();
    let mut best_match_count = 0;

    for (chart_type, keywords) in CHART_KEYWORDS {
        let matched: Vec<&str> = keywords
            .iter()
            .filter(|kw| query_lower.contains(**kw))
            .copied()
            .collect();

        if matched.is_empty() {
            continue;
        }

        intent
            .keywords_matched
            .extend(matched.iter().map(|kw| kw.to_string()));

        if intent.chart_type.is_none() || matched.len() > best_match_count {
            intent.chart_type = Some(*chart_type);
            best_match_count = matched.len();
        }
    }

    match (has_explicit_request, intent.chart_type) {
        (true, Some(_)) => {
            intent.wants_chart = true;
            intent.confidence = 0.9;
        }
        (true, None) => {
            intent.wants_chart = true;
            intent.confidence = 0.7;
            intent.chart_type = Some(ChartType::Auto);
        }
        (false, Some(_)) => {
            intent.wants_chart = true;
            intent.confidence = 0.5;
        }
        (false, None) => {}
    }

    intent.suggested_function = intent.chart_type.and_then(ChartType::builder_name);

    intent
}
