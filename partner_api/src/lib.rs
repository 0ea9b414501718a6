//! # Partner API client
//!
//! Talks to the partner's voucher service. Every voucher call is authenticated in three steps:
//! 1. A fresh session (HTTP client with its own cookie jar) asks `/partner/nonce` for a single-use nonce.
//! 2. The request body is built with the nonce and our API key, hashed, and the hash is signed (see
//!    [`signed_request`]).
//! 3. The body and signature are sent through the same session.
//!
//! Responses come back as [`UpstreamReply`]s. Deciding what a reply means for the caller is left to the voucher
//! engine.
mod api;
mod config;
mod data_objects;
mod error;
mod key_manager;
pub mod paseto;
mod session;
pub mod signed_request;

pub use api::{PartnerApi, NONCE_HEADER, NONCE_PATH, SIGNATURE_HEADER, VOUCHER_GET_PATH, VOUCHER_USE_PATH};
pub use config::PartnerConfig;
pub use data_objects::{
    envelope_succeeded,
    FetchVoucherRequest,
    UpstreamReply,
    UseVouchersRequest,
    Voucher,
    VoucherEnvelope,
};
pub use error::PartnerApiError;
pub use key_manager::{KeyManager, PartnerSigningKey};
pub use session::{Nonce, PartnerSession};
