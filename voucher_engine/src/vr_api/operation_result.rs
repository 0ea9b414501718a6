use log::*;
use partner_api::{PartnerApiError, Voucher};
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

use crate::{RequestContext, VoucherFlowError};

/// The outcome of a voucher operation.
///
/// On the wire this is the `{"success": bool, ...}` object merchants see:
/// * `{"success":true,"voucher":{...}}` or `{"success":true}`
/// * `{"success":false,"reason":"expired"}` / `{"success":false,"reason":"used"}`
/// * `{"success":false,"upstreamResponse":{...}}`
/// * `{"success":false,"upstreamError":...}`
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success(T),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// The voucher's expiration date has passed
    Expired,
    /// The voucher has already been redeemed
    Used,
    /// The partner answered, but with `success: false`. The envelope is passed on unchanged.
    UpstreamResponse(Value),
    /// The partner call failed outright. Carries the partner's error body, if it sent one.
    UpstreamError(Option<Value>),
}

impl Failure {
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Expired => Some("expired"),
            Self::Used => Some("used"),
            _ => None,
        }
    }
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f),
        }
    }
}

impl OperationResult<()> {
    /// The result reported to a caller when an operation failed with an error instead of a result.
    pub fn from_error(err: &VoucherFlowError) -> Self {
        Self::Failure(Failure::UpstreamError(err.upstream_body().cloned()))
    }
}

/// What a successful result adds next to `"success": true`.
pub trait SuccessPayload {
    fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error>;
}

impl SuccessPayload for () {
    fn serialize_fields<M: SerializeMap>(&self, _map: &mut M) -> Result<(), M::Error> {
        Ok(())
    }
}

impl SuccessPayload for Voucher {
    fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("voucher", self)
    }
}

impl<T: SuccessPayload> Serialize for OperationResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Success(payload) => {
                map.serialize_entry("success", &true)?;
                payload.serialize_fields(&mut map)?;
            },
            Self::Failure(failure) => {
                map.serialize_entry("success", &false)?;
                match failure {
                    Failure::Expired | Failure::Used => map.serialize_entry("reason", &failure.reason())?,
                    Failure::UpstreamResponse(envelope) => map.serialize_entry("upstreamResponse", envelope)?,
                    Failure::UpstreamError(body) => map.serialize_entry("upstreamError", body)?,
                }
            },
        }
        map.end()
    }
}

/// Sorts a failed partner call into a result or an error.
///
/// A handshake the partner refused is an answer like any other `success: false` envelope, and becomes a
/// [`Failure::UpstreamResponse`]. Everything else is an error: transport failures carry the request context and the
/// partner's body (and are logged with both), configuration problems are reported as such.
pub fn interpret_partner_error<T>(
    context: RequestContext,
    err: PartnerApiError,
) -> Result<OperationResult<T>, VoucherFlowError> {
    match err {
        PartnerApiError::HandshakeRejected(envelope) => {
            info!("🎟️ Partner refused the nonce handshake for {context}. Response: {envelope}");
            Ok(OperationResult::Failure(Failure::UpstreamResponse(envelope)))
        },
        PartnerApiError::Configuration(message) => {
            error!("🎟️ Cannot call the partner for {context}. {message}");
            Err(VoucherFlowError::Configuration(message))
        },
        PartnerApiError::Transport { status, message, body } => {
            let shown = body.as_ref().map(|b| b.to_string()).unwrap_or_else(|| "<no body>".to_string());
            error!("🎟️ Partner call failed for {context}. {message}. Partner response: {shown}");
            Err(VoucherFlowError::UpstreamTransport { context, status, message, body })
        },
        PartnerApiError::Initialization(message) => {
            error!("🎟️ Could not set up a partner session for {context}. {message}");
            Err(VoucherFlowError::UpstreamTransport { context, status: None, message, body: None })
        },
        e @ (PartnerApiError::MissingNonce | PartnerApiError::JsonError(_)) => {
            error!("🎟️ Partner sent an unusable response for {context}. {e}");
            Err(VoucherFlowError::InvalidResponse { context, message: e.to_string() })
        },
    }
}
