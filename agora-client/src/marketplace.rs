use std::time::Duration;

use crate::client::Session;
use crate::resources::{Actions, Agents, Health, Logs};
use crate::retry::RetryConfig;

/// A client against one marketplace gateway. Holds a single [`Session`];
/// every resource view borrows a clone of it, so registering through
/// [`MarketplaceClient::agents`] fixes the resulting token for
/// [`MarketplaceClient::actions`] and [`MarketplaceClient::logs`] too.
#[derive(Clone)]
pub struct MarketplaceClient {
    session: Session,
}

impl MarketplaceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            session: Session::new(base_url),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            session: Session::with_timeout(base_url, timeout),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.session = self.session.with_retry(retry);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.session = self.session.with_token(token);
        self
    }

    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    pub fn agents(&self) -> Agents {
        Agents::new(self.session.clone())
    }

    pub fn actions(&self) -> Actions {
        Actions::new(self.session.clone())
    }

    pub fn logs(&self) -> Logs {
        Logs::new(self.session.clone())
    }

    pub fn health(&self) -> Health {
        Health::new(self.session.clone())
    }
}
