//! Request handler for daemon HTTP requests.

use async_trait::async_trait;
use modpaths_http::{ErrorCode, Request, RequestHandler, Response};
use modpaths_indexer::IndexStore;
use std::sync::Arc;

/// Answers queries from the shared index store
pub struct DaemonHandler {
    store: Arc<IndexStore>,
}

impl DaemonHandler {
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for DaemonHandler {
    async fn handle(&self, request: Request) -> Response {
        match request {
            Request::Query { partial, kind } => {
                let matches = self.store.query(&partial, kind);
                tracing::debug!(
                    query = %partial,
                    kind = kind.as_str(),
                    matches = matches.len(),
                    "Query"
                );
                Response::Matches(matches)
            }

            Request::Rebuild => {
                // Walks are blocking filesystem work
                let store = self.store.clone();
                match tokio::task::spawn_blocking(move || store.rebuild()).await {
                    Ok(stats) => {
                        tracing::info!(
                            generation = stats.generation,
                            entries = stats.entries,
                            "Forced rebuild complete"
                        );
                        Response::Rebuilt
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Forced rebuild failed");
                        Response::error(ErrorCode::InternalError, e.to_string())
                    }
                }
            }
        }
    }
}
