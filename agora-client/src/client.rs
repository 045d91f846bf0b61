use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::pool::shared_client;
use crate::retry::RetryConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A session against one marketplace gateway: a shared connection pool, an
/// optional bearer token, and a retry policy. Cloning a `Session` is cheap —
/// every field is reference-counted or `Copy`-ish — so each resource view
/// (agents, actions, logs) holds its own clone rather than a shared `Arc`.
#[derive(Clone)]
pub struct Session {
    http: Client,
    base_url: Arc<str>,
    token: Arc<std::sync::RwLock<Option<String>>>,
    retry: RetryConfig,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            http: shared_client(&base_url, timeout),
            base_url: Arc::from(base_url),
            token: Arc::new(std::sync::RwLock::new(None)),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// Binds (or clears, with `None`) the bearer token used on every
    /// subsequent request. Registration fixes this after the gateway
    /// returns a fresh token for the allocated agent id.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize, R: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<R> {
        self.retry
            .run(|| async {
                let mut request = self.http.request(method.clone(), self.url(path));
                if let Some(token) = self.token() {
                    request = request.bearer_auth(token);
                }
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request.send().await?;
                let status = response.status();
                let bytes = response.bytes().await?;

                if status.is_success() {
                    serde_json::from_slice(&bytes).map_err(ClientError::Decode)
                } else {
                    let message = serde_json::from_slice::<serde_json::Value>(&bytes)
                        .ok()
                        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                        .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
                    Err(ClientError::Api { status, message })
                }
            })
            .await
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.send::<(), R>(reqwest::Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<R> {
        self.send(reqwest::Method::POST, path, Some(body)).await
    }
}
