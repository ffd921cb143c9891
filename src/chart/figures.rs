//! Figure builders
//!
//! Named builders the dispatcher invokes. Each takes plain financial
//! figures and returns an opaque `Figure` spec for a separate rendering
//! layer; no I/O, no panics.

use crate::models::{ChartType, Figure, Metric};
use crate::table::{int_opt, num, num_opt, text, DataTable, Row};
use serde_json::json;

fn year_suffix(fiscal_year: Option<i64>) -> String {
    fiscal_year.map(|y| format!(" ({})", y)).unwrap_or_default()
}

pub fn income_statement_waterfall(row: &Row, company_name: &str) -> Figure {
    let steps = [
        ("Revenue", num(row, "revenue")),
        ("Cost of Sales", -num(row, "cost_of_sales")),
        ("Gross Profit", num(row, "gross_profit")),
        ("Operating Expenses", -num(row, "operating_expenses")),
        ("Operating Profit", num(row, "operating_profit")),
        ("Other Income", num(row, "other_income")),
        ("Interest Expense", -num(row, "interest_expense")),
        ("Tax Expense", -num(row, "tax_expense")),
        ("Net Profit", num(row, "net_profit")),
    ];

    Figure {
        kind: ChartType::Waterfall,
        title: format!(
            "Income Statement Waterfall - {}{}",
            company_name,
            year_suffix(int_opt(row, "fiscal_year"))
        ),
        spec: json!({
            "labels": steps.iter().map(|(label, _)| *label).collect::<Vec<_>>(),
            "values": steps.iter().map(|(_, value)| *value).collect::<Vec<_>>(),
        }),
    }
}

pub fn balance_sheet_composition(row: &Row, company_name: &str) -> Figure {
    let total_assets = num(row, "total_assets");
    let current_assets = num(row, "current_assets");
    let total_liabilities = num(row, "total_liabilities");
    let current_liabilities = num(row, "current_liabilities");

    Figure {
        kind: ChartType::BalanceSheet,
        title: format!(
            "Balance Sheet Composition - {}{}",
            company_name,
            year_suffix(int_opt(row, "fiscal_year"))
        ),
        spec: json!({
            "assets": {
                "current": current_assets,
                "non_current": total_assets - current_assets,
                "total": total_assets,
            },
            "liabilities": {
                "current": current_liabilities,
                "non_current": total_liabilities - current_liabilities,
                "total": total_liabilities,
            },
            "equity": num(row, "total_equity"),
        }),
    }
}

pub fn ratio_radar_chart(ratios: &[(String, f64)], company_name: &str) -> Figure {
    Figure {
        kind: ChartType::Radar,
        title: format!("Financial Ratio Profile - {}", company_name),
        spec: json!({
            "axes": ratios.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>(),
            "values": ratios.iter().map(|(_, value)| *value).collect::<Vec<_>>(),
        }),
    }
}

pub fn multi_year_trend(table: &DataTable, company_name: &str, metrics: &[Metric]) -> Figure {
    let mut points: Vec<_> = table
        .rows()
        .iter()
        .filter(|row| text(row, "company_name") == company_name)
        .filter_map(|row| {
            let year = int_opt(row, "fiscal_year")?;
            let values: Vec<f64> = metrics.iter().map(|m| num(row, m.as_str())).collect();
            Some((year, values))
        })
        .collect();
    points.sort_by_key(|(year, _)| *year);

    Figure {
        kind: ChartType::Trend,
        title: format!("Multi-Year Trend - {}", company_name),
        spec: json!({
            "metrics": metrics.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
            "years": points.iter().map(|(year, _)| *year).collect::<Vec<_>>(),
            "series": points.iter().map(|(_, values)| values.clone()).collect::<Vec<_>>(),
        }),
    }
}

pub fn yoy_comparison_chart(
    table: &DataTable,
    metric: Metric,
    year1: i32,
    year2: i32,
    top_n: u32,
) -> Figure {
    let mut rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|row| int_opt(row, "fiscal_year") == Some(i64::from(year2)))
        .map(|row| (text(row, "company_name"), num(row, metric.as_str())))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows.truncate(top_n as usize);

    let comparisons: Vec<_> = rows
        .into_iter()
        .map(|(company, latest)| {
            let previous = table
                .rows()
                .iter()
                .find(|row| {
                    text(row, "company_name") == company
                        && int_opt(row, "fiscal_year") == Some(i64::from(year1))
                })
                .map(|row| num(row, metric.as_str()))
                .unwrap_or(0.0);
            json!({
                "company": company,
                "year1_value": previous,
                "year2_value": latest,
            })
        })
        .collect();

    Figure {
        kind: ChartType::Yoy,
        title: format!(
            "{} Comparison: {} vs {}",
            metric.as_str(),
            year1,
            year2
        ),
        spec: json!({
            "metric": metric.as_str(),
            "year1": year1,
            "year2": year2,
            "companies": comparisons,
        }),
    }
}

pub fn sector_sunburst(table: &DataTable, value_column: &str) -> Figure {
    let slices: Vec<_> = table
        .rows()
        .iter()
        .map(|row| {
            json!({
                "sector": text(row, "sector"),
                "company": text(row, "company_name"),
                "value": num(row, value_column),
            })
        })
        .collect();

    Figure {
        kind: ChartType::Sunburst,
        title: format!("Market Composition by {}", value_column),
        spec: json!({ "value_column": value_column, "slices": slices }),
    }
}

pub fn sector_performance_heatmap(table: &DataTable, metrics: &[&str]) -> Figure {
    let cells: Vec<_> = table
        .rows()
        .iter()
        .map(|row| {
            let values: Vec<f64> = metrics.iter().map(|m| num(row, m)).collect();
            json!({ "sector": text(row, "sector"), "values": values })
        })
        .collect();

    Figure {
        kind: ChartType::Heatmap,
        title: "Sector Performance Heatmap".to_string(),
        spec: json!({ "metrics": metrics, "cells": cells }),
    }
}

pub fn risk_return_scatter(table: &DataTable, return_column: &str, risk_column: &str) -> Figure {
    let points: Vec<_> = table
        .rows()
        .iter()
        .filter_map(|row| {
            Some(json!({
                "company": text(row, "company_name"),
                "return": num_opt(row, return_column)?,
                "risk": num_opt(row, risk_column)?,
            }))
        })
        .collect();

    Figure {
        kind: ChartType::Scatter,
        title: format!("Risk-Return: {} vs {}", return_column, risk_column),
        spec: json!({
            "return_column": return_column,
            "risk_column": risk_column,
            "points": points,
        }),
    }
}

pub fn financial_dashboard(row: &Row, company_name: &str) -> Figure {
    Figure {
        kind: ChartType::Dashboard,
        title: format!(
            "Financial Dashboard - {}{}",
            company_name,
            year_suffix(int_opt(row, "fiscal_year"))
        ),
        spec: json!({
            "revenue": num(row, "revenue"),
            "net_profit": num(row, "net_profit"),
            "total_assets": num(row, "total_assets"),
            "total_equity": num(row, "total_equity"),
            "roe": num(row, "roe"),
            "roa": num(row, "roa"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_waterfall_defaults_missing_fields_to_zero() {
        let table = DataTable::from_records(&json!([
            {"company_name": "Saudi Aramco", "revenue": 1800.0, "net_profit": 400.0}
        ]));
        let figure = income_statement_waterfall(table.first().unwrap(), "Saudi Aramco");

        assert_eq!(figure.kind, ChartType::Waterfall);
        assert_eq!(figure.spec["values"][0], json!(1800.0));
        // cost_of_sales absent -> 0
        assert_eq!(figure.spec["values"][1], json!(-0.0));
    }

    #[test]
    fn test_trend_orders_points_by_year() {
        let table = DataTable::from_records(&json!([
            {"company_name": "Riyad Bank", "fiscal_year": 2024, "revenue": 16.0},
            {"company_name": "Riyad Bank", "fiscal_year": 2022, "revenue": 12.0},
            {"company_name": "Riyad Bank", "fiscal_year": 2023, "revenue": 14.0},
            {"company_name": "Other Co", "fiscal_year": 2023, "revenue": 99.0},
        ]));
        let figure = multi_year_trend(&table, "Riyad Bank", &[Metric::Revenue]);

        assert_eq!(figure.spec["years"], json!([2022, 2023, 2024]));
        assert_eq!(figure.spec["series"], json!([[12.0], [14.0], [16.0]]));
    }

    #[test]
    fn test_yoy_ranks_by_latest_year_and_truncates() {
        let table = DataTable::from_records(&json!([
            {"company_name": "A", "fiscal_year": 2024, "revenue": 10.0},
            {"company_name": "B", "fiscal_year": 2024, "revenue": 30.0},
            {"company_name": "C", "fiscal_year": 2024, "revenue": 20.0},
            {"company_name": "B", "fiscal_year": 2023, "revenue": 25.0},
        ]));
        let figure = yoy_comparison_chart(&table, Metric::Revenue, 2023, 2024, 2);
        let companies = figure.spec["companies"].as_array().unwrap();

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0]["company"], json!("B"));
        assert_eq!(companies[0]["year1_value"], json!(25.0));
        assert_eq!(companies[1]["company"], json!("C"));
        assert_eq!(companies[1]["year1_value"], json!(0.0));
    }

    #[test]
    fn test_scatter_skips_rows_missing_either_column() {
        let table = DataTable::from_records(&json!([
            {"company_name": "A", "roe": 0.15, "debt_to_equity": 0.8},
            {"company_name": "B", "roe": 0.10},
        ]));
        let figure = risk_return_scatter(&table, "roe", "debt_to_equity");
        assert_eq!(figure.spec["points"].as_array().unwrap().len(), 1);
    }
}
