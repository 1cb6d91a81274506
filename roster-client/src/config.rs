//! Client configuration

use crate::{ClientError, ClientResult, GraphQlGateway};
use shared::KeyScheme;

/// Default GraphQL endpoint (matches roster-mock's default port)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4001/graphql";

/// Client configuration for the employee list
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ROSTER_ENDPOINT | http://localhost:4001/graphql | GraphQL endpoint |
/// | ROSTER_TOKEN | (none) | Bearer token |
/// | ROSTER_TIMEOUT_SECS | 30 | Transport timeout |
/// | ROSTER_PAGE_SIZE | 10 | Rows per page |
/// | ROSTER_KEY_SCHEME | id | `id` or `user_name` |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds (enforced by the HTTP transport only)
    pub timeout: u64,

    /// Rows per page, fixed per deployment
    pub page_size: u32,

    /// Which field identifies an employee
    pub key_scheme: KeyScheme,
}

impl ClientConfig {
    /// Create a new configuration for an endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            timeout: 30,
            page_size: 10,
            key_scheme: KeyScheme::Id,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("ROSTER_ENDPOINT").unwrap_or(defaults.endpoint),
            token: std::env::var("ROSTER_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout: std::env::var("ROSTER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            page_size: std::env::var("ROSTER_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_size),
            key_scheme: std::env::var("ROSTER_KEY_SCHEME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.key_scheme),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the key scheme
    pub fn with_key_scheme(mut self, scheme: KeyScheme) -> Self {
        self.key_scheme = scheme;
        self
    }

    /// Reject configurations the controller cannot work with
    pub fn validate(&self) -> ClientResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ClientError::Config("endpoint must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(ClientError::Config("page_size must be positive".into()));
        }
        Ok(())
    }

    /// Create a GraphQL gateway from this configuration
    pub fn build_gateway(&self) -> ClientResult<GraphQlGateway> {
        self.validate()?;
        GraphQlGateway::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
