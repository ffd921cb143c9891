use financial_query_router::{
    api::start_server,
    index::ReferenceIndex,
    llm::GeminiChat,
    router::QueryRouter,
    table::DataTable,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Load the reference index from a JSON records file when configured.
fn load_index() -> Option<ReferenceIndex> {
    let path = std::env::var("TICKER_INDEX_PATH").ok()?;

    match std::fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<serde_json::Value>(&contents) {
            Ok(value) => {
                let index = ReferenceIndex::from_table(&DataTable::from_records(&value));
                info!("Loaded reference index from {}", path);
                Some(index)
            }
            Err(e) => {
                warn!("Invalid JSON in {}: {}", path, e);
                None
            }
        },
        Err(e) => {
            warn!("Could not read {}: {}", path, e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Financial Query Router - API Server");
    info!("Port: {}", api_port);

    let mut router = QueryRouter::new();

    if let Some(index) = load_index() {
        router = router.with_index(Arc::new(index));
    } else {
        warn!("No reference index configured (TICKER_INDEX_PATH); entity extraction disabled");
    }

    match std::env::var("GEMINI_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => {
            router = router.with_llm(Arc::new(GeminiChat::new(api_key)?));
            info!("LLM fallback enabled");
        }
        _ => {
            warn!("GEMINI_API_KEY not set; LLM fallback disabled");
        }
    }

    start_server(Arc::new(router), api_port).await?;

    Ok(())
}
