//! Query Router
//!
//! Orchestrates entity extraction, keyword classification and the
//! optional LLM fallback into a single routing decision with a
//! provenance-encoded confidence.
//!
//! With the LLM fallback disabled, `route` is a pure function of
//! (query, reference index contents): identical inputs always yield
//! identical decisions.

use crate::classifier::IntentClassifier;
use crate::entities::extract_entities;
use crate::index::ReferenceIndex;
use crate::llm::{classify_with_llm, ChatClient};
use crate::models::{EntityBundle, Intent, Provenance, RoutingDecision, ViewName};
use std::sync::Arc;
use tracing::info;

/// Routes free-form financial questions to precomputed data views.
pub struct QueryRouter {
    index: Option<Arc<ReferenceIndex>>,
    chat: Option<Arc<dyn ChatClient>>,
}

impl QueryRouter {
    /// Router without entity extraction or LLM fallback.
    pub fn new() -> Self {
        Self {
            index: None,
            chat: None,
        }
    }

    /// Enable entity extraction against a shared reference index.
    pub fn with_index(mut self, index: Arc<ReferenceIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Enable the LLM fallback for queries the keyword scan cannot place.
    pub fn with_llm(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Keyword-only routing: pure, synchronous, no suspension points.
    ///
    /// Empty or whitespace queries short-circuit to the general view
    /// with an empty entity bundle; extraction is skipped entirely.
    pub fn route_keywords(&self, query: &str) -> RoutingDecision {
        if query.trim().is_empty() {
            info!("Empty query - routing to {}", ViewName::TasiFinancials);
            return RoutingDecision::fallback(EntityBundle::default());
        }

        let entities = match &self.index {
            Some(index) => extract_entities(query, index),
            None => EntityBundle::default(),
        };

        let intent = IntentClassifier::classify(query);
        let decision = match intent {
            Intent::General => RoutingDecision::fallback(entities),
            matched => RoutingDecision::keyword(matched, entities),
        };

        info!("Routed query to {}: {}", decision.view, decision.reason);
        decision
    }

    /// Full routing decision, consulting the LLM fallback when the
    /// keyword scan was inconclusive and a chat client is configured.
    pub async fn route(&self, query: &str) -> RoutingDecision {
        let decision = self.route_keywords(query);

        if decision.provenance == Provenance::Keyword || query.trim().is_empty() {
            return decision;
        }

        let Some(chat) = &self.chat else {
            return decision;
        };

        match classify_with_llm(chat.as_ref(), query, &decision.entities).await {
            Ok((Intent::General, _)) => decision,
            Ok((matched, reason)) => {
                let llm_decision = RoutingDecision::llm(matched, reason, decision.entities);
                info!(
                    "LLM routed query to {}: {}",
                    llm_decision.view, llm_decision.reason
                );
                llm_decision
            }
            // Keep the fallback view but record why the LLM could not
            // weigh in, so a degraded decision stays distinguishable
            // from a genuine GENERAL classification.
            Err(e) => RoutingDecision::fallback_with_reason(
                format!("LLM classification failed: {}", e),
                decision.entities,
            ),
        }
    }

    /// The five view names this router can select.
    pub fn available_views(&self) -> [ViewName; 5] {
        ViewName::all()
    }

    /// View for a specific intent.
    pub fn view_for_intent(&self, intent: Intent) -> ViewName {
        intent.view()
    }
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Backward-compatible two-value routing: LLM fallback always disabled,
/// entities and confidence dropped.
pub fn route_query(query: &str) -> (ViewName, String) {
    let decision = QueryRouter::new().route_keywords(query);
    (decision.view, decision.reason)
}
