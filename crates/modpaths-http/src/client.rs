//! HTTP client for communicating with the modpaths daemon.

use crate::{HttpError, Request, Response};
use std::time::Duration;

/// Default daemon address
const DEFAULT_ADDR: &str = "localhost:6118";

/// Connection timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Query timeout
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Forced rebuilds walk every root before answering
const REBUILD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// HTTP client for the daemon
pub struct HttpClient {
    addr: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the default daemon address
    pub fn new() -> Self {
        Self::with_addr(DEFAULT_ADDR)
    }

    /// Create a client for a custom address (`host:port`)
    pub fn with_addr(addr: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to configure HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            addr: addr.into(),
            client,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send a request and return the matches in the response body
    pub async fn request(&self, request: &Request) -> Result<Vec<String>, HttpError> {
        let timeout = match request {
            Request::Query { .. } => QUERY_TIMEOUT,
            Request::Rebuild => REBUILD_TIMEOUT,
        };
        let url = format!("http://{}{}", self.addr, request.to_path());

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    HttpError::DaemonNotRunning(self.addr.clone())
                } else {
                    HttpError::Request(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                message: body.trim_end().to_string(),
            });
        }

        Ok(Response::parse_matches(&body))
    }

    /// Import paths ending in `partial`
    pub async fn imports(&self, partial: &str) -> Result<Vec<String>, HttpError> {
        self.request(&Request::imports(partial)).await
    }

    /// Directories ending in `partial`
    pub async fn dirs(&self, partial: &str) -> Result<Vec<String>, HttpError> {
        self.request(&Request::dirs(partial)).await
    }

    /// Force a rebuild and wait for it to finish
    pub async fn update(&self) -> Result<(), HttpError> {
        self.request(&Request::Rebuild).await?;
        Ok(())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addr() {
        assert_eq!(HttpClient::new().addr(), "localhost:6118");
        assert_eq!(HttpClient::with_addr("127.0.0.1:1").addr(), "127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_daemon_not_running() {
        // Grab a free port, then release it so nothing listens there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::with_addr(addr.to_string());
        let err = client.imports("os").await.unwrap_err();
        assert!(matches!(err, HttpError::DaemonNotRunning(_)));
    }
}
