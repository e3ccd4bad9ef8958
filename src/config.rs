//! Configuration for the ChannelAdvisor client
//!
//! Retry behavior is explicit configuration: each config carries one policy
//! for mutating submit calls and one for read-side queries, and the facades
//! read only what they are handed. There is no ambient/global policy.

use crate::error::{ApiError, ApiResult};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;

/// API credentials for the remote endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Developer key issued by ChannelAdvisor
    pub developer_key: String,
    /// Password paired with the developer key
    pub password: String,
}

impl Credentials {
    /// Create credentials from a developer key and password
    pub fn new(developer_key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            developer_key: developer_key.into(),
            password: password.into(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Account the client operates on
    pub account_id: String,
    /// Optional display name for the account, used in logs only
    pub account_name: Option<String>,
    /// Credentials passed to every remote call
    pub credentials: Credentials,
    /// Retry policy for mutating submit calls
    pub submit_retry: RetryPolicy,
    /// Retry policy for read-side queries
    pub query_retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a configuration for an account
    pub fn new(account_id: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            account_id: account_id.into(),
            account_name: None,
            credentials,
            submit_retry: RetryPolicy::submit(),
            query_retry: RetryPolicy::query(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `CHANNELADVISOR_ACCOUNT_ID`: account the client operates on
    /// - `CHANNELADVISOR_DEVELOPER_KEY`: developer key
    /// - `CHANNELADVISOR_PASSWORD`: password paired with the key
    /// - `CHANNELADVISOR_ACCOUNT_NAME`: optional account display name
    pub fn from_env() -> ApiResult<Self> {
        let account_id = env::var("CHANNELADVISOR_ACCOUNT_ID")
            .map_err(|_| ApiError::MissingEnvVar("CHANNELADVISOR_ACCOUNT_ID".to_string()))?;
        let developer_key = env::var("CHANNELADVISOR_DEVELOPER_KEY")
            .map_err(|_| ApiError::MissingEnvVar("CHANNELADVISOR_DEVELOPER_KEY".to_string()))?;
        let password = env::var("CHANNELADVISOR_PASSWORD")
            .map_err(|_| ApiError::MissingEnvVar("CHANNELADVISOR_PASSWORD".to_string()))?;

        let mut config = Self::new(account_id, Credentials::new(developer_key, password));
        config.account_name = env::var("CHANNELADVISOR_ACCOUNT_NAME").ok();
        Ok(config)
    }

    /// Builder-style method to set the account display name
    #[must_use]
    pub fn with_account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    /// Builder-style method to set the submit retry policy
    #[must_use]
    pub fn with_submit_retry(mut self, policy: RetryPolicy) -> Self {
        self.submit_retry = policy;
        self
    }

    /// Builder-style method to set the query retry policy
    #[must_use]
    pub fn with_query_retry(mut self, policy: RetryPolicy) -> Self {
        self.query_retry = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.account_id.is_empty() {
            return Err(ApiError::config("account_id cannot be empty"));
        }
        if self.credentials.developer_key.is_empty() {
            return Err(ApiError::config("developer_key cannot be empty"));
        }
        if self.submit_retry.max_attempts == 0 || self.query_retry.max_attempts == 0 {
            return Err(ApiError::config("retry policies need at least one attempt"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("acct-1", Credentials::new("dev-key", "secret"))
    }

    #[test]
    fn new_config_uses_submit_and_query_policies() {
        let config = config();
        assert!(config.submit_retry.max_attempts >= config.query_retry.max_attempts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = config()
            .with_account_name("Main Store")
            .with_query_retry(RetryPolicy::no_retry());

        assert_eq!(config.account_name.as_deref(), Some("Main Store"));
        assert_eq!(config.query_retry.max_attempts, 1);
    }

    #[test]
    fn validation_rejects_empty_account() {
        let mut config = config();
        config.account_id.clear();
        assert!(matches!(config.validate(), Err(ApiError::Config(_))));
    }

    #[test]
    fn validation_rejects_zero_attempts() {
        let mut config = config();
        config.submit_retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }
}
