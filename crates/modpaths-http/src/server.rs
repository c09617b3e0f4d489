//! HTTP server for the modpaths daemon.
//!
//! Every path is routed to a single handler that decodes it into a
//! [`Request`] and dispatches it.

use crate::{ErrorCode, HttpError, Request, Response};
use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP server bound to a TCP address
pub struct HttpServer {
    listener: TcpListener,
    handler: Arc<dyn RequestHandler>,
}

impl HttpServer {
    /// Bind to `addr` (e.g. `localhost:6118`, or port 0 for any free port)
    pub async fn bind(addr: &str, handler: Arc<dyn RequestHandler>) -> Result<Self, HttpError> {
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        Ok(Self { listener, handler })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, HttpError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process exits
    pub async fn run(self) -> Result<(), HttpError> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` completes, letting in-flight requests finish
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), HttpError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(self.handler))
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Router that sends every request path to `handler`
pub fn router(handler: Arc<dyn RequestHandler>) -> Router {
    Router::new().fallback(dispatch).with_state(handler)
}

async fn dispatch(State(handler): State<Arc<dyn RequestHandler>>, uri: Uri) -> Response {
    let path = match urlencoding::decode(uri.path()) {
        Ok(path) => path.into_owned(),
        Err(e) => {
            return Response::error(
                ErrorCode::InvalidRequest,
                format!("Failed to decode path: {}", e),
            );
        }
    };

    let request = Request::from_path(&path);
    tracing::debug!("Received request: {:?}", request);

    handler.handle(request).await
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Response::Error { code, .. } => {
                StatusCode::from_u16(code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::OK,
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}

/// Trait for handling incoming requests
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response
    async fn handle(&self, request: Request) -> Response;
}
