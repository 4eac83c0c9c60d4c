use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::Cache;

#[derive(Debug, Deserialize)]
struct RestResult<T> {
    result: Option<T>,
}

#[derive(Debug, Clone)]
struct RestBackend {
    client: Client,
    base_url: String,
    token: String,
}

/// Shared cache backed by a Redis-compatible REST endpoint (`/get`,
/// `/set`, `/del`, `/keys`). Values are stored as JSON strings.
///
/// When the backend isn't configured every operation is a no-op and
/// every read is a miss. Transport and decoding failures are logged and
/// also treated as misses so callers fall through to upstream.
#[derive(Debug, Clone)]
pub struct RestCache {
    backend: Option<RestBackend>,
    prefix: String,
}

impl RestCache {
    pub fn new(base_url: Option<&str>, token: Option<&str>, prefix: &str) -> Self {
        let backend = match (base_url, token) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => {
                Some(RestBackend {
                    client: Client::new(),
                    base_url: url.trim_end_matches('/').to_string(),
                    token: token.to_string(),
                })
            }
            _ => {
                tracing::warn!("Shared cache is not configured, every lookup will miss");
                None
            }
        };
        Self {
            backend,
            prefix: prefix.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl RestBackend {
    fn url(&self, command: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            command,
            urlencoding::encode(key)
        )
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let resp = self
            .client
            .get(self.url("get", key))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        let body: RestResult<String> = resp.json().await?;
        Ok(body.result)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> anyhow::Result<()> {
        self.client
            .post(self.url("set", key))
            .query(&[("EX", ttl.as_secs().max(1).to_string())])
            .bearer_auth(&self.token)
            .body(value)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> anyhow::Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut command = vec![json!("DEL")];
        command.extend(keys.iter().map(|k| json!(k)));
        self.client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> anyhow::Result<Vec<String>> {
        let resp = self
            .client
            .get(self.url("keys", pattern))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        let body: RestResult<Vec<String>> = resp.json().await?;
        Ok(body.result.unwrap_or_default())
    }
}

#[async_trait]
impl Cache for RestCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let backend = self.backend.as_ref()?;
        let full_key = self.full_key(key);
        let raw = match backend.get(&full_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Shared cache read failed for {}: {}", full_key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Shared cache value for {} is not JSON: {}", full_key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        let Some(backend) = &self.backend else {
            return;
        };
        let full_key = self.full_key(key);
        if let Err(e) = backend.set(&full_key, value.to_string(), ttl).await {
            tracing::warn!("Shared cache write failed for {}: {}", full_key, e);
        }
    }

    async fn clear(&self, key: Option<&str>) {
        let Some(backend) = &self.backend else {
            return;
        };
        let result = match key {
            Some(k) => backend.del(&[self.full_key(k)]).await,
            // Without a prefix the pattern would match every key in the store
            None if self.prefix.is_empty() => {
                tracing::warn!("Refusing to clear the shared cache without a key prefix");
                return;
            }
            None => match backend.keys(&format!("{}*", self.prefix)).await {
                Ok(keys) => backend.del(&keys).await,
                Err(e) => Err(e),
            },
        };
        if let Err(e) = result {
            tracing::warn!("Shared cache clear failed: {}", e);
        }
    }
}
