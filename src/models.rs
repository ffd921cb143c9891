//! Core data models for query routing and chart intent detection

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Views & Intents =================
//

/// The five precomputed data views a query can be routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    TopBottomPerformers,
    SectorBenchmarksLatest,
    CompanyAnnualTimeseries,
    LatestFinancials,
    TasiFinancials,
}

impl ViewName {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::TopBottomPerformers => "top_bottom_performers",
            ViewName::SectorBenchmarksLatest => "sector_benchmarks_latest",
            ViewName::CompanyAnnualTimeseries => "company_annual_timeseries",
            ViewName::LatestFinancials => "latest_financials",
            ViewName::TasiFinancials => "tasi_financials",
        }
    }

    pub fn all() -> [ViewName; 5] {
        [
            ViewName::TopBottomPerformers,
            ViewName::SectorBenchmarksLatest,
            ViewName::CompanyAnnualTimeseries,
            ViewName::LatestFinancials,
            ViewName::TasiFinancials,
        ]
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified purpose of a query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Ranking,
    Sector,
    Timeseries,
    Latest,
    General,
}

impl Intent {
    /// Optimal view for this intent.
    pub fn view(self) -> ViewName {
        match self {
            Intent::Ranking => ViewName::TopBottomPerformers,
            Intent::Sector => ViewName::SectorBenchmarksLatest,
            Intent::Timeseries => ViewName::CompanyAnnualTimeseries,
            Intent::Latest => ViewName::LatestFinancials,
            Intent::General => ViewName::TasiFinancials,
        }
    }

    /// Human-readable routing reason for this intent.
    pub fn reason(self) -> &'static str {
        match self {
            Intent::Ranking => "Ranking query detected",
            Intent::Sector => "Sector comparison query detected",
            Intent::Timeseries => "Time series/growth query detected",
            Intent::Latest => "Latest data query detected",
            Intent::General => "General query - using full dataset",
        }
    }
}

//
// ================= Entities =================
//

/// Structured references recognized in free text. Each list is
/// deduplicated and insertion-ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityBundle {
    pub tickers: Vec<String>,
    pub companies: Vec<String>,
    pub sectors: Vec<String>,
}

impl EntityBundle {
    pub fn push_ticker(&mut self, ticker: &str) {
        if !self.tickers.iter().any(|t| t == ticker) {
            self.tickers.push(ticker.to_string());
        }
    }

    pub fn push_company(&mut self, company: &str) {
        if !self.companies.iter().any(|c| c == company) {
            self.companies.push(company.to_string());
        }
    }

    pub fn push_sector(&mut self, sector: &str) {
        if !self.sectors.iter().any(|s| s == sector) {
            self.sectors.push(sector.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty() && self.companies.is_empty() && self.sectors.is_empty()
    }
}

//
// ================= Routing Decision =================
//

/// Where a routing decision came from. Confidence strictly encodes
/// provenance: keyword match 1.0, LLM match 0.8, fallback 0.5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Keyword,
    Llm,
    Fallback,
}

impl Provenance {
    pub fn confidence(self) -> f32 {
        match self {
            Provenance::Keyword => 1.0,
            Provenance::Llm => 0.8,
            Provenance::Fallback => 0.5,
        }
    }
}

/// A single routing decision, created fresh per query.
///
/// Built only through the provenance constructors so the
/// confidence/provenance pairing cannot drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingDecision {
    pub view: ViewName,
    pub reason: String,
    pub entities: EntityBundle,
    pub provenance: Provenance,
}

impl RoutingDecision {
    /// Decision produced by the keyword classifier (confidence 1.0).
    pub fn keyword(intent: Intent, entities: EntityBundle) -> Self {
        Self {
            view: intent.view(),
            reason: intent.reason().to_string(),
            entities,
            provenance: Provenance::Keyword,
        }
    }

    /// Decision produced by the LLM classifier (confidence 0.8).
    pub fn llm(intent: Intent, reason: String, entities: EntityBundle) -> Self {
        Self {
            view: intent.view(),
            reason,
            entities,
            provenance: Provenance::Llm,
        }
    }

    /// Default decision when nothing matched (confidence 0.5).
    pub fn fallback(entities: EntityBundle) -> Self {
        Self::fallback_with_reason(Intent::General.reason().to_string(), entities)
    }

    /// Fallback decision with a diagnostic reason, used when a
    /// collaborator failure forced the degradation.
    pub fn fallback_with_reason(reason: String, entities: EntityBundle) -> Self {
        Self {
            view: Intent::General.view(),
            reason,
            entities,
            provenance: Provenance::Fallback,
        }
    }

    pub fn confidence(&self) -> f32 {
        self.provenance.confidence()
    }
}

//
// ================= Chart Types =================
//

/// Closed set of chart types. Unsupported combinations are handled by
/// exhaustive matching in the dispatcher rather than string lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Waterfall,
    BalanceSheet,
    Radar,
    BarComparison,
    Trend,
    Yoy,
    Sunburst,
    Heatmap,
    Scatter,
    Dashboard,
    Pie,
    Line,
    /// Explicit chart request without a recognizable type; resolved
    /// downstream by the rendering layer.
    Auto,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Waterfall => "waterfall",
            ChartType::BalanceSheet => "balance_sheet",
            ChartType::Radar => "radar",
            ChartType::BarComparison => "bar_comparison",
            ChartType::Trend => "trend",
            ChartType::Yoy => "yoy",
            ChartType::Sunburst => "sunburst",
            ChartType::Heatmap => "heatmap",
            ChartType::Scatter => "scatter",
            ChartType::Dashboard => "dashboard",
            ChartType::Pie => "pie",
            ChartType::Line => "line",
            ChartType::Auto => "auto",
        }
    }

    /// Name of the dedicated builder for this type, if one exists.
    /// Pie, line and auto are left to generic rendering downstream.
    pub fn builder_name(self) -> Option<&'static str> {
        match self {
            ChartType::Waterfall => Some("income_statement_waterfall"),
            ChartType::BalanceSheet => Some("balance_sheet_composition"),
            ChartType::Radar => Some("ratio_radar_chart"),
            ChartType::BarComparison => Some("ratio_comparison_bars"),
            ChartType::Trend => Some("multi_year_trend"),
            ChartType::Yoy => Some("yoy_comparison_chart"),
            ChartType::Sunburst => Some("sector_sunburst"),
            ChartType::Heatmap => Some("sector_performance_heatmap"),
            ChartType::Scatter => Some("risk_return_scatter"),
            ChartType::Dashboard => Some("financial_dashboard"),
            ChartType::Pie | ChartType::Line | ChartType::Auto => None,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether, and with what type, a query requests a visualization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartIntent {
    pub wants_chart: bool,
    pub chart_type: Option<ChartType>,
    pub confidence: f32,
    pub keywords_matched: Vec<String>,
    pub suggested_function: Option<&'static str>,
}

impl ChartIntent {
    pub fn none() -> Self {
        Self {
            wants_chart: false,
            chart_type: None,
            confidence: 0.0,
            keywords_matched: Vec::new(),
            suggested_function: None,
        }
    }
}

//
// ================= Chart Parameters =================
//

/// Canonical financial metrics recognized in chart queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    NetProfit,
    GrossProfit,
    Roe,
    Roa,
    DebtToEquity,
}

impl Metric {
    /// Canonical column name in the financial data.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::NetProfit => "net_profit",
            Metric::GrossProfit => "gross_profit",
            Metric::Roe => "roe",
            Metric::Roa => "roa",
            Metric::DebtToEquity => "debt_to_equity",
        }
    }
}

/// Sparse chart construction parameters. Empty collections and `None`
/// mean "not extracted"; only positive matches are populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartParameters {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub years: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub top_n: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sectors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub companies: Vec<String>,
}

impl ChartParameters {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.top_n.is_none()
            && self.metrics.is_empty()
            && self.sectors.is_empty()
            && self.companies.is_empty()
    }
}

//
// ================= Figures & Suggestions =================
//

/// Opaque chart specification handed to a separate rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Figure {
    pub kind: ChartType,
    pub title: String,
    pub spec: serde_json::Value,
}

/// A chart the current data could support, derived from column presence.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSuggestion {
    pub chart_type: ChartType,
    pub title: &'static str,
    pub description: &'static str,
    pub example_query: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_serialization_uses_snake_case_names() {
        let json = serde_json::to_string(&ViewName::TopBottomPerformers).unwrap();
        assert_eq!(json, "\"top_bottom_performers\"");
        assert_eq!(ViewName::TasiFinancials.as_str(), "tasi_financials");
    }

    #[test]
    fn test_confidence_encodes_provenance() {
        let keyword = RoutingDecision::keyword(Intent::Ranking, EntityBundle::default());
        let llm = RoutingDecision::llm(
            Intent::Sector,
            "mentions sector benchmarks".to_string(),
            EntityBundle::default(),
        );
        let fallback = RoutingDecision::fallback(EntityBundle::default());

        assert_eq!(keyword.confidence(), 1.0);
        assert_eq!(llm.confidence(), 0.8);
        assert_eq!(fallback.confidence(), 0.5);
        assert_eq!(fallback.reason, "General query - using full dataset");
    }

    #[test]
    fn test_entity_bundle_dedup_preserves_insertion_order() {
        let mut bundle = EntityBundle::default();
        bundle.push_ticker("2222");
        bundle.push_ticker("1010");
        bundle.push_ticker("2222");
        bundle.push_company("Saudi Aramco");
        bundle.push_company("Saudi Aramco");

        assert_eq!(bundle.tickers, vec!["2222", "1010"]);
        assert_eq!(bundle.companies, vec!["Saudi Aramco"]);
    }

    #[test]
    fn test_builder_names_cover_dedicated_types_only() {
        assert_eq!(
            ChartType::Waterfall.builder_name(),
            Some("income_statement_waterfall")
        );
        assert_eq!(
            ChartType::BarComparison.builder_name(),
            Some("ratio_comparison_bars")
        );
        assert_eq!(ChartType::Pie.builder_name(), None);
        assert_eq!(ChartType::Auto.builder_name(), None);
    }

    #[test]
    fn test_chart_parameters_sparse_serialization() {
        let params = ChartParameters {
            years: vec![2023, 2024],
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["years"], serde_json::json!([2023, 2024]));
        assert!(json.get("top_n").is_none());
        assert!(json.get("metrics").is_none());
    }
}
