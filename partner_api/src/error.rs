use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PartnerApiError {
    #[error("Invalid partner API configuration: {0}")]
    Configuration(String),
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The partner rejected the nonce handshake. {0}")]
    HandshakeRejected(Value),
    #[error("The nonce handshake succeeded, but no usable x-nonce header was returned")]
    MissingNonce,
    #[error("Partner request failed. {message}")]
    Transport { status: Option<u16>, message: String, body: Option<Value> },
    #[error("Could not (de)serialize JSON: {0}")]
    JsonError(String),
}

impl PartnerApiError {
    /// The body the partner sent along with a failed call, if there was one.
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            Self::Transport { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for PartnerApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport { status: e.status().map(|s| s.as_u16()), message: e.to_string(), body: None }
    }
}
