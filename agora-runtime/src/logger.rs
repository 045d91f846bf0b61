use std::sync::Mutex;

use agora_client::Logs;
use agora_model::{Log, LogLevel};
use serde_json::Value;
use tokio::task::JoinHandle;

const DEFAULT_FLUSH_THRESHOLD: usize = 100;

/// A logger that writes to two sinks at once: the process's own `tracing`
/// output, synchronously, and the marketplace's log journal, fire-and-forget.
/// A failure shipping a log remotely is itself logged locally and never
/// propagated — nothing calling `log()` should have to handle it.
pub struct DualLogger {
    name: String,
    logs: Logs,
    pending: Mutex<Vec<JoinHandle<()>>>,
    flush_threshold: usize,
}

impl DualLogger {
    pub fn new(name: impl Into<String>, logs: Logs) -> Self {
        Self::with_flush_threshold(name, logs, DEFAULT_FLUSH_THRESHOLD)
    }

    pub fn with_flush_threshold(name: impl Into<String>, logs: Logs, flush_threshold: usize) -> Self {
        Self {
            name: name.into(),
            logs,
            pending: Mutex::new(Vec::new()),
            flush_threshold,
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, data: Option<Value>) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!(agent = %self.name, "{message}"),
            LogLevel::Info => tracing::info!(agent = %self.name, "{message}"),
            LogLevel::Warning => tracing::warn!(agent = %self.name, "{message}"),
            LogLevel::Error => tracing::error!(agent = %self.name, "{message}"),
        }

        let entry = Log {
            level,
            name: self.name.clone(),
            message: Some(message),
            data,
            metadata: None,
        };
        let logs = self.logs.clone();
        let agent_name = self.name.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = logs.create(entry).await {
                tracing::warn!(agent = %agent_name, "failed to ship log to marketplace: {err}");
            }
        });

        let to_flush = {
            let mut pending = self.pending.lock().expect("log queue mutex poisoned");
            pending.push(handle);
            if pending.len() >= self.flush_threshold {
                Some(std::mem::take(&mut *pending))
            } else {
                None
            }
        };
        if let Some(handles) = to_flush {
            tokio::spawn(async move {
                for handle in handles {
                    let _ = handle.await;
                }
            });
        }
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, None);
    }

    /// Logs at `error` level with the current error's rendering appended to
    /// the message.
    pub fn exception(&self, message: impl AsRef<str>, err: &(dyn std::error::Error + Send + Sync)) {
        self.log(LogLevel::Error, format!("{}: {err}", message.as_ref()), None);
    }

    /// Awaits every outstanding remote-write task. Always called on agent
    /// shutdown so no log is silently dropped when the process exits.
    pub async fn flush(&self) {
        let handles = {
            let mut pending = self.pending.lock().expect("log queue mutex poisoned");
            std::mem::take(&mut *pending)
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use agora_client::MarketplaceClient;
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn flush_awaits_every_pending_remote_write() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/logs/create");
                then.status(200).json_body(json!({"error": null}));
            })
            .await;

        let client = MarketplaceClient::new(server.base_url());
        let logger = DualLogger::new("test-agent", client.logs());
        logger.info("hello");
        logger.info("world");
        logger.flush().await;

        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn flush_runs_automatically_once_the_threshold_is_reached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/logs/create");
                then.status(200).json_body(json!({"error": null}));
            })
            .await;

        let client = MarketplaceClient::new(server.base_url());
        let logger = DualLogger::with_flush_threshold("test-agent", client.logs(), 2);
        logger.info("one");
        logger.info("two");
        // give the auto-flush task a chance to run before the test exits
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        mock.assert_hits_async(2).await;
    }
}
