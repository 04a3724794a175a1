//! HTTP plumbing: a pooled client provider and a wrapper for requests made
//! to the platform's repository-service REST API.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::ActionError;
use crate::session::ConnectionOptions;

#[derive(Debug, Clone)]
pub struct HttpPoolConfig {
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub default_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for HttpPoolConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            default_timeout: Duration::from_secs(30),
            tcp_keepalive: Some(Duration::from_secs(60)),
        }
    }
}

/// Owns the shared connection pool for all engine-issued HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpClientProvider {
    client: reqwest::Client,
    config: HttpPoolConfig,
}

impl Default for HttpClientProvider {
    fn default() -> Self {
        Self::new(HttpPoolConfig::default())
    }
}

impl HttpClientProvider {
    pub fn new(config: HttpPoolConfig) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_keepalive(config.tcp_keepalive)
            .timeout(config.default_timeout)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }

    pub fn config(&self) -> &HttpPoolConfig {
        &self.config
    }
}

/// Client for the platform's repository-service endpoints (task lookup,
/// execution status, script logs).
///
/// Repository paths are prefixed with the session's virtual-proxy prefix,
/// mirroring how the surrounding platform routes its own API calls.
#[derive(Debug, Clone)]
pub struct PlatformRestClient {
    client: reqwest::Client,
    base: Url,
    prefix: Option<String>,
}

impl PlatformRestClient {
    pub fn new(
        provider: &HttpClientProvider,
        connection: &ConnectionOptions,
    ) -> Result<Self, ActionError> {
        let scheme = if connection.secure { "https" } else { "http" };
        let mut base = format!("{}://{}", scheme, connection.host);
        if let Some(port) = connection.port {
            base.push_str(&format!(":{}", port));
        }
        let base = Url::parse(&base).map_err(|e| ActionError::Config(e.to_string()))?;
        Ok(Self {
            client: provider.client(),
            base,
            prefix: connection
                .prefix
                .as_ref()
                .map(|p| p.trim_matches('/').to_string())
                .filter(|p| !p.is_empty()),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, ActionError> {
        let prefixed = match &self.prefix {
            Some(prefix) if path.starts_with("/qrs") => format!("/{}{}", prefix, path),
            _ => path.to_string(),
        };
        self.base
            .join(&prefixed)
            .map_err(|e| ActionError::Http(e.to_string()))
    }

    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ActionError> {
        let response = self
            .client
            .get(self.url_for(path)?)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn get_text(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, ActionError> {
        let response = self
            .client
            .get(self.url_for(path)?)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    pub async fn post_json(&self, path: &str) -> Result<Value, ActionError> {
        let response = self
            .client
            .post(self.url_for(path)?)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
