use std::sync::Arc;

use log::*;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::PartnerConfig,
    data_objects::{envelope_succeeded, FetchVoucherRequest, UpstreamReply, UseVouchersRequest, VoucherEnvelope},
    key_manager::{KeyManager, PartnerSigningKey},
    session::{Nonce, PartnerSession},
    signed_request::SignedRequest,
    PartnerApiError,
};

pub const NONCE_PATH: &str = "/partner/nonce";
pub const VOUCHER_GET_PATH: &str = "/partner/voucher/get";
pub const VOUCHER_USE_PATH: &str = "/partner/voucher/use";
pub const NONCE_HEADER: &str = "x-nonce";
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Client for the partner's voucher API.
///
/// Cloning is cheap; clones share the configuration and the signing key. HTTP clients are _not_ shared: every
/// operation opens its own [`PartnerSession`] with a fresh cookie jar.
#[derive(Clone, Debug)]
pub struct PartnerApi {
    config: Arc<PartnerConfig>,
    keys: Arc<KeyManager>,
}

impl PartnerApi {
    pub fn new(config: PartnerConfig) -> Result<Self, PartnerApiError> {
        config.validate()?;
        let keys = KeyManager::new(config.api_secret.clone());
        Ok(Self { config: Arc::new(config), keys: Arc::new(keys) })
    }

    pub fn config(&self) -> &PartnerConfig {
        &self.config
    }

    /// Returns the request signing key, building it on first use.
    pub fn signing_key(&self) -> Result<&PartnerSigningKey, PartnerApiError> {
        self.keys.signing_key()
    }

    /// Opens a new session and asks the partner for a nonce bound to it.
    pub async fn new_session_with_nonce(&self) -> Result<PartnerSession, PartnerApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| PartnerApiError::Initialization(e.to_string()))?;
        let url = self.config.url(NONCE_PATH);
        trace!("🤝️ Requesting nonce from {url}");
        let response = client.post(&url).json(&serde_json::json!({})).send().await?;
        let response = check_status(&url, response).await?;
        let nonce = response.headers().get(NONCE_HEADER).and_then(|v| v.to_str().ok()).map(String::from);
        let envelope = read_json(&url, response).await?;
        if !envelope_succeeded(&envelope) {
            warn!("🤝️ Nonce handshake was rejected by the partner. Response: {envelope}");
            return Err(PartnerApiError::HandshakeRejected(envelope));
        }
        let nonce = nonce.filter(|n| !n.is_empty()).ok_or_else(|| {
            warn!("🤝️ Nonce handshake succeeded, but the {NONCE_HEADER} header is missing");
            PartnerApiError::MissingNonce
        })?;
        trace!("🤝️ Received nonce {nonce}");
        Ok(PartnerSession::new(client, Nonce::new(nonce)))
    }

    /// Sends a signed request through `session`, consuming it along with its nonce.
    pub async fn post_signed<T, R>(
        &self,
        session: PartnerSession,
        path: &str,
        fields: &T,
    ) -> Result<UpstreamReply<R>, PartnerApiError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let key = self.keys.signing_key()?;
        let (client, nonce) = session.into_parts();
        let request = SignedRequest::build(key, fields, &self.config.api_key, nonce)?;
        let url = self.config.url(path);
        debug!("🔐️ Sending signed request to {url}. Content hash: {}", request.content_hash());
        let (body, signature) = request.into_parts();
        let response = client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await?;
        let response = check_status(&url, response).await?;
        let envelope = read_json(&url, response).await?;
        UpstreamReply::from_envelope(envelope)
    }

    pub async fn fetch_voucher(&self, id: Option<&str>) -> Result<UpstreamReply<VoucherEnvelope>, PartnerApiError> {
        // Fail on a bad secret before spending a nonce
        self.signing_key()?;
        let session = self.new_session_with_nonce().await?;
        debug!("🎟️ Fetching voucher {}", id.unwrap_or("<none>"));
        self.post_signed(session, VOUCHER_GET_PATH, &FetchVoucherRequest { id }).await
    }

    pub async fn use_vouchers(
        &self,
        cart_amount: Option<i64>,
        vouchers: &[String],
    ) -> Result<UpstreamReply<Value>, PartnerApiError> {
        self.signing_key()?;
        let session = self.new_session_with_nonce().await?;
        debug!("🎟️ Redeeming {} voucher(s) against a cart of {cart_amount:?}", vouchers.len());
        self.post_signed(session, VOUCHER_USE_PATH, &UseVouchersRequest { cart_amount, vouchers }).await
    }
}

async fn check_status(url: &str, response: Response) -> Result<Response, PartnerApiError> {
    let status = response.status();
    if status.is_success() {
        trace!("Partner call successful. {status}");
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(text) => parse_error_body(&text),
        Err(e) => {
            warn!("Could not read the body of a failed partner call to {url}. {e}");
            None
        },
    };
    Err(PartnerApiError::Transport { status: Some(status.as_u16()), message: format!("{url} returned {status}"), body })
}

async fn read_json(url: &str, response: Response) -> Result<Value, PartnerApiError> {
    response
        .json::<Value>()
        .await
        .map_err(|e| PartnerApiError::JsonError(format!("{url} did not return valid JSON. {e}")))
}

fn parse_error_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_bodies() {
        assert_eq!(parse_error_body(""), None);
        assert_eq!(parse_error_body("  \n"), None);
        assert_eq!(parse_error_body(r#"{"success":false}"#), Some(json!({"success": false})));
        assert_eq!(parse_error_body("Bad Gateway"), Some(json!("Bad Gateway")));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = PartnerApi::new(PartnerConfig::new("", "key", "secret")).unwrap_err();
        assert!(matches!(err, PartnerApiError::Configuration(_)));
    }
}
