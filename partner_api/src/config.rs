use std::env;

use log::*;
use vr_common::Secret;

use crate::PartnerApiError;

#[derive(Debug, Clone, Default)]
pub struct PartnerConfig {
    /// Base URL of the partner API, without a trailing slash. e.g. "https://partner.example.com/api"
    pub api_url: String,
    /// Identifies this merchant to the partner. It is embedded in every signed request body.
    pub api_key: String,
    /// Base64-encoded Ed25519 seed (or seed + public key) used to sign requests.
    pub api_secret: Secret<String>,
}

impl PartnerConfig {
    pub fn new(api_url: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: Secret::new(api_secret.to_string()),
        }
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = env::var("API_URL").unwrap_or_else(|_| {
            error!("🪛️ API_URL is not set. Please set it to the base URL of the partner API.");
            String::default()
        });
        let api_key = env::var("API_KEY").unwrap_or_else(|_| {
            error!("🪛️ API_KEY is not set. Please set it to the API key issued by the partner.");
            String::default()
        });
        let api_secret = env::var("API_SECRET").unwrap_or_else(|_| {
            error!("🪛️ API_SECRET is not set. Signed requests will fail until it is.");
            String::default()
        });
        Self::new(&api_url, &api_key, &api_secret)
    }

    /// Checks the non-secret parts of the configuration. The secret is validated when the signing key is first built.
    pub fn validate(&self) -> Result<(), PartnerApiError> {
        if self.api_url.is_empty() {
            return Err(PartnerApiError::Configuration("API_URL is empty".into()));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(PartnerApiError::Configuration(format!(
                "API_URL must be an http(s) URL, not '{}'",
                self.api_url
            )));
        }
        if self.api_key.is_empty() {
            warn!("🪛️ API_KEY is empty. The partner will most likely reject every request.");
        }
        Ok(())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }
}
