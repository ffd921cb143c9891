//! Financial Query Router
//!
//! Query-interpretation subsystem for a financial data assistant:
//! - Routes free-form questions to precomputed data views via keyword
//!   patterns, without an LLM call per query
//! - Extracts tickers, companies and sectors against an immutable
//!   reference index
//! - Falls back to an LLM classifier only for inconclusive queries,
//!   with a bounded timeout and no retry
//! - Detects chart intent in parallel and dispatches to figure builders
//!
//! Confidence encodes provenance: keyword 1.0 > LLM 0.8 > fallback 0.5.

pub mod api;
pub mod chart;
pub mod classifier;
pub mod entities;
pub mod error;
pub mod index;
pub mod llm;
pub mod models;
pub mod router;
pub mod table;

pub use error::Result;

// Re-export common types
pub use chart::{
    detect_chart_intent, extract_chart_parameters, generate_chart_from_data,
    get_chart_suggestions,
};
pub use classifier::IntentClassifier;
pub use entities::extract_entities;
pub use index::{IndexEntry, ReferenceIndex};
pub use models::*;
pub use router::{route_query, QueryRouter};
pub use table::DataTable;
