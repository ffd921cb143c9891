//! Chart Dispatcher
//!
//! Maps a chart type to its builder and assembles arguments from the
//! data. Generation is best-effort: any missing precondition yields
//! `None`, never an error.

use super::figures;
use crate::models::{ChartParameters, ChartSuggestion, ChartType, Figure, Metric};
use crate::table::{num_opt, text, DataTable, Row};
use tracing::debug;

/// Ratio columns considered for radar and heatmap charts.
const RATIO_METRICS: &[&str] = &[
    "roe",
    "roa",
    "net_margin",
    "gross_margin",
    "operating_margin",
    "current_ratio",
    "quick_ratio",
    "debt_to_equity",
    "debt_to_assets",
    "asset_turnover",
    "inventory_turnover",
];

/// Target row for single-company charts: the first extracted company
/// when present in the data, else the first row.
fn target_row<'a>(table: &'a DataTable, params: &ChartParameters) -> Option<(&'a Row, String)> {
    if let Some(company) = params.companies.first() {
        if let Some(row) = table.find_row("company_name", company) {
            return Some((row, company.clone()));
        }
    }
    let row = table.first()?;
    Some((row, text(row, "company_name")))
}

/// Build a figure for the detected chart type from the data.
///
/// Unhandled types (bar comparison, pie, line, auto) yield `None`, as
/// does any unmet data precondition.
pub fn generate_chart_from_data(
    table: &DataTable,
    chart_type: ChartType,
    params: &ChartParameters,
) -> Option<Figure> {
    if table.is_empty() {
        debug!("No data rows, skipping {} chart", chart_type);
        return None;
    }

    let figure = match chart_type {
        ChartType::Waterfall => {
            let (row, company) = target_row(table, params)?;
            Some(figures::income_statement_waterfall(row, &company))
        }

        ChartType::BalanceSheet => {
            let (row, company) = target_row(table, params)?;
            Some(figures::balance_sheet_composition(row, &company))
        }

        ChartType::Radar => {
            let (row, company) = target_row(table, params)?;
            let ratios: Vec<(String, f64)> = RATIO_METRICS
                .iter()
                .filter_map(|metric| {
                    let value = num_opt(row, metric)?;
                    Some((metric.to_uppercase().replace('_', " "), value))
                })
                .collect();
            if ratios.is_empty() {
                None
            } else {
                Some(figures::ratio_radar_chart(&ratios, &company))
            }
        }

        ChartType::Trend => {
            let company = params.companies.first()?;
            let metrics: &[Metric] = if params.metrics.is_empty() {
                &[Metric::Revenue, Metric::NetProfit]
            } else {
                &params.metrics
            };
            Some(figures::multi_year_trend(table, company, metrics))
        }

        ChartType::Yoy => {
            if params.years.len() < 2 {
                return None;
            }
            let year1 = *params.years.iter().min()?;
            let year2 = *params.years.iter().max()?;
            let metric = params.metrics.first().copied().unwrap_or(Metric::Revenue);
            let top_n = params.top_n.unwrap_or(10);
            Some(figures::yoy_comparison_chart(table, metric, year1, year2, top_n))
        }

        ChartType::Sunburst => {
            let metric = params.metrics.first().copied().unwrap_or(Metric::Revenue);
            if !table.has_column(metric.as_str()) {
                return None;
            }
            Some(figures::sector_sunburst(table, metric.as_str()))
        }

        ChartType::Heatmap => {
            let requested: Vec<&str> = if params.metrics.is_empty() {
                RATIO_METRICS[..6].to_vec()
            } else {
                params.metrics.iter().map(|m| m.as_str()).collect()
            };
            let available: Vec<&str> = requested
                .into_iter()
                .filter(|metric| table.has_column(metric))
                .collect();
            if available.is_empty() {
                None
            } else {
                Some(figures::sector_performance_heatmap(table, &available))
            }
        }

        ChartType::Scatter => {
            let return_column = if table.has_column("roe") { "roe" } else { "net_margin" };
            let risk_column = if table.has_column("debt_to_equity") {
                "debt_to_equity"
            } else {
                "debt_to_assets"
            };
            Some(figures::risk_return_scatter(table, return_column, risk_column))
        }

        ChartType::Dashboard => {
            let (row, company) = target_row(table, params)?;
            Some(figures::financial_dashboard(row, &company))
        }

        // No dedicated dispatch path; resolved downstream or not at all.
        ChartType::BarComparison | ChartType::Pie | ChartType::Line | ChartType::Auto => None,
    };

    if figure.is_none() {
        debug!("No {} chart could be built from the data", chart_type);
    }

    figure
}

/// Suggest charts the current data can support, from column presence.
pub fn get_chart_suggestions(table: &DataTable) -> Vec<ChartSuggestion> {
    let mut suggestions = Vec::new();

    if table.is_empty() {
        return suggestions;
    }

    let has_any = |columns: &[&str]| columns.iter().any(|c| table.has_column(c));

    if has_any(&["revenue", "net_profit", "gross_profit", "operating_profit"]) {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Waterfall,
            title: "Income Statement Waterfall",
            description: "See how revenue flows to net profit",
            example_query: "Show income statement waterfall for [company]",
        });
    }

    if has_any(&["total_assets", "total_liabilities", "total_equity"]) {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::BalanceSheet,
            title: "Balance Sheet Composition",
            description: "View assets, liabilities, and equity breakdown",
            example_query: "Show balance sheet composition for [company]",
        });
    }

    if has_any(&["roe", "roa", "current_ratio", "debt_to_equity"]) {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Radar,
            title: "Financial Ratio Profile",
            description: "Compare ratios in a radar chart",
            example_query: "Show ratio radar chart for [company]",
        });
    }

    if table.has_column("fiscal_year") && table.distinct_count("fiscal_year") > 1 {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Trend,
            title: "Multi-Year Trend",
            description: "Track financial metrics over time",
            example_query: "Show revenue trend for [company]",
        });
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Yoy,
            title: "Year-over-Year Comparison",
            description: "Compare metrics between years",
            example_query: "Compare revenue 2023 vs 2024",
        });
    }

    if table.has_column("sector") {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Sunburst,
            title: "Sector Composition",
            description: "Hierarchical view of market by sector",
            example_query: "Show sector sunburst by revenue",
        });
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Heatmap,
            title: "Sector Performance Heatmap",
            description: "Compare sector performance across metrics",
            example_query: "Show sector performance heatmap",
        });
    }

    // Any single risk/return column is enough to offer the scatter view;
    // the builder falls back across column pairs at render time.
    let risk_return = ["roe", "roa", "debt_to_equity", "debt_to_assets"]
        .iter()
        .any(|col| table.has_column(col));
    if risk_return {
        suggestions.push(ChartSuggestion {
            chart_type: ChartType::Scatter,
            title: "Risk-Return Analysis",
            description: "Plot companies by risk and return metrics",
            example_query: "Show risk-return scatter plot",
        });
    }

    suggestions.push(ChartSuggestion {
        chart_type: ChartType::Dashboard,
        title: "Financial Dashboard",
        description: "Overview of key financial metrics",
        example_query: "Show financial dashboard for [company]",
    });

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn financials_table() -> DataTable {
        DataTable::from_records(&json!([
            {
                "company_name": "Saudi Aramco",
                "sector": "Energy",
                "fiscal_year": 2024,
                "revenue": 1800.0,
                "net_profit": 400.0,
                "total_assets": 2500.0,
                "total_liabilities": 900.0,
                "total_equity": 1600.0,
                "roe": 0.25,
                "debt_to_equity": 0.56
            },
            {
                "company_name": "Riyad Bank",
                "sector": "Financials",
                "fiscal_year": 2024,
                "revenue": 15.5,
                "net_profit": 8.0,
                "total_assets": 380.0,
                "total_liabilities": 320.0,
                "total_equity": 60.0,
                "roe": 0.13,
                "debt_to_equity": 5.3
            },
            {
                "company_name": "Riyad Bank",
                "sector": "Financials",
                "fiscal_year": 2023,
                "revenue": 14.1,
                "net_profit": 7.1,
                "total_assets": 350.0,
                "total_liabilities": 296.0,
                "total_equity": 54.0,
                "roe": 0.13,
                "debt_to_equity": 5.5
            }
        ]))
    }

    #[test]
    fn test_waterfall_targets_extracted_company() {
        let table = financials_table();
        let params = ChartParameters {
            companies: vec!["Riyad Bank".to_string()],
            ..Default::default()
        };
        let figure = generate_chart_from_data(&table, ChartType::Waterfall, &params).unwrap();
        assert!(figure.title.contains("Riyad Bank"));
    }

    #[test]
    fn test_waterfall_falls_back_to_first_row() {
        let table = financials_table();
        let figure =
            generate_chart_from_data(&table, ChartType::Waterfall, &ChartParameters::default())
                .unwrap();
        assert!(figure.title.contains("Saudi Aramco"));
    }

    #[test]
    fn test_unhandled_types_yield_none() {
        let table = financials_table();
        let params = ChartParameters::default();
        for chart_type in [
            ChartType::BarComparison,
            ChartType::Pie,
            ChartType::Line,
            ChartType::Auto,
        ] {
            assert!(
                generate_chart_from_data(&table, chart_type, &params).is_none(),
                "{chart_type} should have no dispatch path"
            );
        }
    }

    #[test]
    fn test_yoy_requires_two_years() {
        let table = financials_table();
        let one_year = ChartParameters {
            years: vec![2024],
            ..Default::default()
        };
        assert!(generate_chart_from_data(&table, ChartType::Yoy, &one_year).is_none());

        let two_years = ChartParameters {
            years: vec![2024, 2023],
            ..Default::default()
        };
        let figure = generate_chart_from_data(&table, ChartType::Yoy, &two_years).unwrap();
        assert_eq!(figure.spec["year1"], json!(2023));
        assert_eq!(figure.spec["year2"], json!(2024));
    }

    #[test]
    fn test_trend_requires_company() {
        let table = financials_table();
        assert!(
            generate_chart_from_data(&table, ChartType::Trend, &ChartParameters::default())
                .is_none()
        );

        let params = ChartParameters {
            companies: vec!["Riyad Bank".to_string()],
            ..Default::default()
        };
        assert!(generate_chart_from_data(&table, ChartType::Trend, &params).is_some());
    }

    #[test]
    fn test_sunburst_requires_metric_column() {
        let table = financials_table();
        let missing_metric = ChartParameters {
            metrics: vec![Metric::GrossProfit],
            ..Default::default()
        };
        assert!(generate_chart_from_data(&table, ChartType::Sunburst, &missing_metric).is_none());
        assert!(generate_chart_from_data(
            &table,
            ChartType::Sunburst,
            &ChartParameters::default()
        )
        .is_some());
    }

    #[test]
    fn test_empty_table_yields_none() {
        let table = DataTable::default();
        assert!(
            generate_chart_from_data(&table, ChartType::Dashboard, &ChartParameters::default())
                .is_none()
        );
    }

    #[test]
    fn test_suggestions_follow_column_presence() {
        let table = financials_table();
        let suggestions = get_chart_suggestions(&table);
        let types: Vec<ChartType> = suggestions.iter().map(|s| s.chart_type).collect();

        assert!(types.contains(&ChartType::Waterfall));
        assert!(types.contains(&ChartType::BalanceSheet));
        assert!(types.contains(&ChartType::Trend));
        assert!(types.contains(&ChartType::Yoy));
        assert!(types.contains(&ChartType::Sunburst));
        assert!(types.contains(&ChartType::Scatter));
        assert_eq!(types.last(), Some(&ChartType::Dashboard));
    }

    #[test]
    fn test_suggestions_without_multi_year_data() {
        let table = DataTable::from_records(&json!([
            {"company_name": "A", "revenue": 1.0, "fiscal_year": 2024}
        ]));
        let types: Vec<ChartType> = get_chart_suggestions(&table)
            .iter()
            .map(|s| s.chart_type)
            .collect();
        assert!(!types.contains(&ChartType::Trend));
        assert!(!types.contains(&ChartType::Yoy));
        assert!(!types.contains(&ChartType::Sunburst));
    }

    #[test]
    fn test_scatter_suggested_with_single_risk_column() {
        let table = DataTable::from_records(&json!([
            {"company_name": "A", "roe": 0.12}
        ]));
        let types: Vec<ChartType> = get_chart_suggestions(&table)
            .iter()
            .map(|s| s.chart_type)
            .collect();
        assert!(types.contains(&ChartType::Scatter));
    }

    #[test]
    fn test_empty_table_has_no_suggestions() {
        assert!(get_chart_suggestions(&DataTable::default()).is_empty());
    }
}
