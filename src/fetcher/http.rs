// SPDX-License-Identifier: GPL-3.0-only
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::SyncError;
use crate::fetcher::traits::{PackageFetcher, ProgressFn};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::utils::validate_remote_url;

/// HTTP fetcher for the well-known package origin.
///
/// One shared client, no retries: a failed transfer fails the session and
/// the caller owns any retry-on-user-action policy.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        validate_remote_url(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("PakSyncDaemon/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl PackageFetcher for HttpFetcher {
    async fn fetch_manifest(&self) -> Result<Manifest, SyncError> {
        let url = self.url_for(MANIFEST_FILE);
        info!(url = %url, "Fetching remote manifest");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::network(&url, e))?;
        response
            .error_for_status_ref()
            .map_err(|e| SyncError::network(&url, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::network(&url, e))?;

        let manifest = Manifest::from_json(&body)?;
        info!(packages = manifest.len(), "Remote manifest fetched");
        Ok(manifest)
    }

    async fn fetch_package(
        &self,
        name: &str,
        progress: ProgressFn<'_>,
    ) -> Result<Vec<u8>, SyncError> {
        let url = self.url_for(name);
        info!(url = %url, "Starting package download");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::network(&url, e))?;
        response
            .error_for_status_ref()
            .map_err(|e| SyncError::network(&url, e))?;

        let total = response.content_length();
        // Preallocation is capped; the advertised length is not trusted.
        let mut body = Vec::with_capacity(total.unwrap_or(0).min(16 * 1024 * 1024) as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| SyncError::network(&url, e))?;
            body.extend_from_slice(&chunk);
            progress(body.len() as u64, total);
        }

        debug!(url = %url, bytes = body.len(), "Package download completed");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    async fn setup_mock_server() -> (mockito::ServerGuard, String) {
        let server = mockito::Server::new_async().await;
        let base_url = server.url();
        (server, base_url)
    }

    fn no_progress() -> impl Fn(u64, Option<u64>) + Send + Sync {
        |_, _| {}
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(HttpFetcher::new("ftp://example.com/packages", 30).is_err());
        assert!(HttpFetcher::new("not-a-url", 30).is_err());
    }

    #[test]
    fn test_url_joining_strips_trailing_slash() {
        let fetcher = HttpFetcher::new("http://example.com/packages/", 30).unwrap();
        assert_eq!(
            fetcher.url_for("base.zip"),
            "http://example.com/packages/base.zip"
        );
    }

    #[tokio::test]
    async fn test_fetch_manifest_success() {
        let (mut server, base_url) = setup_mock_server().await;
        let fetcher = HttpFetcher::new(&base_url, 30).unwrap();

        let mock = server
            .mock("GET", "/manifest.json")
            .with_status(200)
            .with_body(r#"{"b.zip":"2","a.zip":"1"}"#)
            .create_async()
            .await;

        let manifest = fetcher.fetch_manifest().await.unwrap();
        let names: Vec<&str> = manifest.names().collect();
        assert_eq!(names, vec!["b.zip", "a.zip"]);
        assert_eq!(manifest.get("b.zip"), Some("2"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_manifest_http_error_is_network_error() {
        let (mut server, base_url) = setup_mock_server().await;
        let fetcher = HttpFetcher::new(&base_url, 30).unwrap();

        let mock = server
            .mock("GET", "/manifest.json")
            .with_status(404)
            .create_async()
            .await;

        let result = fetcher.fetch_manifest().await;
        assert!(matches!(result, Err(SyncError::NetworkError { .. })));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_manifest_malformed_body_is_parse_error() {
        let (mut server, base_url) = setup_mock_server().await;
        let fetcher = HttpFetcher::new(&base_url, 30).unwrap();

        let mock = server
            .mock("GET", "/manifest.json")
            .with_status(200)
            .with_body("<html>not a manifest</html>")
            .create_async()
            .await;

        let result = fetcher.fetch_manifest().await;
        assert!(matches!(result, Err(SyncError::ParseError(_))));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_package_returns_content() {
        let (mut server, base_url) = setup_mock_server().await;
        let fetcher = HttpFetcher::new(&base_url, 30).unwrap();

        let mock = server
            .mock("GET", "/base.zip")
            .with_status(200)
            .with_body("package bytes")
            .create_async()
            .await;

        let progress = no_progress();
        let content = fetcher.fetch_package("base.zip", &progress).await.unwrap();
        assert_eq!(content, b"package bytes");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_package_reports_final_progress() {
        let (mut server, base_url) = setup_mock_server().await;
        let fetcher = HttpFetcher::new(&base_url, 30).unwrap();

        let body = vec![7u8; 4096];
        let _mock = server
            .mock("GET", "/base.zip")
            .with_status(200)
            .with_body(body.clone())
            .create_async()
            .await;

        let seen: Mutex<Vec<(u64, Option<u64>)>> = Mutex::new(Vec::new());
        let progress = |loaded: u64, total: Option<u64>| {
            seen.lock().unwrap().push((loaded, total));
        };

        let content = fetcher.fetch_package("base.zip", &progress).await.unwrap();
        assert_eq!(content.len(), body.len());

        let seen = seen.into_inner().unwrap();
        assert!(!seen.is_empty());
        let (last_loaded, last_total) = *seen.last().unwrap();
        assert_eq!(last_loaded, body.len() as u64);
        assert_eq!(last_total, Some(body.len() as u64));
    }

    #[tokio::test]
    async fn test_fetch_package_server_error_is_network_error() {
        let (mut server, base_url) = setup_mock_server().await;
        let fetcher = HttpFetcher::new(&base_url, 30).unwrap();

        let mock = server
            .mock("GET", "/base.zip")
            .with_status(500)
            .create_async()
            .await;

        let progress = no_progress();
        let result = fetcher.fetch_package("base.zip", &progress).await;
        assert!(matches!(result, Err(SyncError::NetworkError { .. })));

        mock.assert_async().await;
    }
}
