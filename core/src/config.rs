//! Base URL resolution.

use std::env;

/// Environment variable holding the backend origin.
pub const API_URL_ENV: &str = "API_URL";

/// Origin used when `API_URL` is unset.
pub const DEFAULT_API_DOMAIN: &str = "http://localhost:5000";

/// Version prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

/// Where the API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Build from a deployment origin, appending `/api/v1` unless the origin
    /// already ends with it.
    pub fn from_domain(domain: &str) -> Self {
        let domain = domain.trim().trim_end_matches('/');
        let base_url = if domain.ends_with(API_PREFIX) {
            domain.to_string()
        } else {
            format!("{domain}{API_PREFIX}")
        };
        Self { base_url }
    }

    /// Read `API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(domain) if !domain.trim().is_empty() => Self::from_domain(&domain),
            _ => Self::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_domain(DEFAULT_API_DOMAIN)
    }
}
