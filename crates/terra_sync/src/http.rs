//! HTTP remote source.
//!
//! Fetches the whole catalog with a single GET request. The response body
//! is read in full before decoding, so a call that is dropped mid-flight
//! never yields a partial catalog.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteSource;
use async_trait::async_trait;
use reqwest::Client;
use terra_codec::{decode_wire_payload, WireRecord};
use tracing::debug;

/// Remote source backed by a REST catalog endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemoteSource {
    client: Client,
    url: String,
}

impl HttpRemoteSource {
    /// Creates a source for the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a network error if the HTTP client cannot be built.
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SyncError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.catalog_url(),
        })
    }

    /// The catalog request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn transport_error(error: reqwest::Error) -> SyncError {
    if error.is_timeout() {
        SyncError::Timeout
    } else {
        SyncError::network(error.to_string())
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_all(&self) -> SyncResult<Vec<WireRecord>> {
        debug!(url = %self.url, "requesting catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::http_status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        debug!(bytes = body.len(), "received catalog payload");

        Ok(decode_wire_payload(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn decodes_successful_response() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"cca3":"PER","cca2":"PE","name":{"common":"Peru"}},{"cca3":7}]"#,
        )
        .await;
        let source = HttpRemoteSource::new(&SyncConfig::new(base)).unwrap();

        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cca3.as_deref(), Some("PER"));
    }

    #[tokio::test]
    async fn non_success_status_is_network_failure() {
        let base = serve_once("HTTP/1.1 503 Service Unavailable", "").await;
        let source = HttpRemoteSource::new(&SyncConfig::new(base)).unwrap();

        let error = source.fetch_all().await.unwrap_err();
        assert!(matches!(error, SyncError::Network { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_failure() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"message":"not a list"}"#).await;
        let source = HttpRemoteSource::new(&SyncConfig::new(base)).unwrap();

        let error = source.fetch_all().await.unwrap_err();
        assert!(matches!(error, SyncError::Decode(_)));
    }

    #[test]
    fn url_comes_from_config() {
        let config = SyncConfig::new("http://127.0.0.1:9/v3.1").with_fields(["name", "cca3"]);
        let source = HttpRemoteSource::new(&config).unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/v3.1/all?fields=name,cca3");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_failure() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let config = SyncConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
        let source = HttpRemoteSource::new(&config).unwrap();

        let error = source.fetch_all().await.unwrap_err();
        assert!(error.is_recoverable());
    }
}
