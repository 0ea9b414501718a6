use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The inputs of an operation, kept so that failures can be logged and reported with what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum RequestContext {
    Get {
        id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Use {
        cart_amount: Option<i64>,
        vouchers: Vec<String>,
    },
}

impl Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get { id } => write!(f, "get(id={})", id.as_deref().unwrap_or("<none>")),
            Self::Use { cart_amount, vouchers } => {
                let amount = cart_amount.map(|a| a.to_string()).unwrap_or_else(|| "NaN".to_string());
                write!(f, "use(cartAmount={amount}, vouchers=[{}])", vouchers.join(", "))
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum VoucherFlowError {
    #[error("The relay is misconfigured. {0}")]
    Configuration(String),
    #[error("Partner call failed for {context}. {message}")]
    UpstreamTransport { context: RequestContext, status: Option<u16>, message: String, body: Option<Value> },
    #[error("Partner sent an unusable response for {context}. {message}")]
    InvalidResponse { context: RequestContext, message: String },
}

impl VoucherFlowError {
    pub fn context(&self) -> Option<&RequestContext> {
        match self {
            Self::Configuration(_) => None,
            Self::UpstreamTransport { context, .. } => Some(context),
            Self::InvalidResponse { context, .. } => Some(context),
        }
    }

    /// The body the partner attached to a failed call, if any.
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            Self::UpstreamTransport { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}
