use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use partner_api::PartnerApiError;
use thiserror::Error;
use voucher_engine::{OperationResult, VoucherFlowError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    VoucherFlowError(#[from] VoucherFlowError),
}

impl From<PartnerApiError> for ServerError {
    fn from(e: PartnerApiError) -> Self {
        match e {
            PartnerApiError::Configuration(s) => Self::ConfigurationError(s),
            e => Self::InitializeError(e.to_string()),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Errors are reported in the same `{"success":false,...}` shape as every other result, with whatever the
    /// partner sent back (if anything) under `upstreamError`.
    fn error_response(&self) -> HttpResponse {
        let result = match self {
            Self::VoucherFlowError(e) => OperationResult::from_error(e),
            _ => OperationResult::from_error(&VoucherFlowError::Configuration(self.to_string())),
        };
        let body = serde_json::to_string(&result).unwrap_or_else(|_| r#"{"success":false,"upstreamError":null}"#.into());
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body)
    }
}
