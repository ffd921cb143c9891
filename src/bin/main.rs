use financial_query_router::{
    chart::{detect_chart_intent, extract_chart_parameters},
    index::{IndexEntry, ReferenceIndex},
    router::QueryRouter,
};
use std::sync::Arc;
use tracing::info;

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
            ticker: "2010".into(),
            company_name: "SABIC".into(),
            sector: "Materials".into(),
        },
        IndexEntry {
            ticker: "2050".into(),
            company_name: "Savola Group".into(),
            sector: "Consumer Staples".into(),
        },
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    info!("Financial Query Router - demo");

    let router = QueryRouter::new().with_index(Arc::new(sample_index()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let queries: Vec<String> = if args.is_empty() {
        vec![
            "top 10 companies by revenue".to_string(),
            "show 2222 performance".to_string(),
            "compare banking sector margins".to_string(),
            "plot revenue trend for riyad bank 2022 vs 2024".to_string(),
            "show me all data".to_string(),
        ]
    } else {
        vec![args.join(" ")]
    };

    for query in queries {
        let decision = router.route(&query).await;
        let chart = detect_chart_intent(&query);
        let params = extract_chart_parameters(&query, None);

        println!("\n=== QUERY: {} ===", query);
        println!("View:       {}", decision.view);
        println!("Reason:     {}", decision.reason);
        println!("Confidence: {}", decision.confidence());
        if !decision.entities.is_empty() {
            println!("Entities:   {:?}", decision.entities);
        }
        if chart.wants_chart {
            println!(
                "Chart:      {} (confidence {})",
                chart
                    .chart_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "auto".to_string()),
                chart.confidence
            );
        }
        if !params.is_empty() {
            println!("Params:     {}", serde_json::to_string(&params)?);
        }
    }

    Ok(())
}
