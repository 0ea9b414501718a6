//! Voucher Engine
//!
//! The voucher engine implements the two operations the relay offers to merchant backends:
//! * **get** fetches a voucher from the partner and checks that it can still be redeemed (not expired, not used).
//! * **use** redeems a set of vouchers against a cart amount.
//!
//! The engine does not talk HTTP itself. It drives a [`PartnerGateway`](traits::PartnerGateway), which is implemented
//! for [`partner_api::PartnerApi`], and turns whatever comes back into an [`OperationResult`]. Recoverable outcomes
//! (rejections by the partner, expired or used vouchers) are `Ok` results; transport and configuration problems are
//! returned as [`VoucherFlowError`]s so that the caller can log and surface them.
pub mod traits;
mod vr_api;

pub use partner_api::Voucher;
pub use vr_api::{
    errors::{RequestContext, VoucherFlowError},
    operation_result::{interpret_partner_error, Failure, OperationResult, SuccessPayload},
    validation::check_voucher,
    voucher_flow_api::VoucherFlowApi,
};
