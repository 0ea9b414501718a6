use std::fmt::Debug;

use chrono::Utc;
use log::*;
use partner_api::{UpstreamReply, Voucher, VoucherEnvelope};

use crate::{
    traits::PartnerGateway,
    vr_api::{operation_result::interpret_partner_error, validation::check_voucher},
    Failure,
    OperationResult,
    RequestContext,
    VoucherFlowError,
};

/// `VoucherFlowApi` runs the voucher operations against a partner gateway.
///
/// Each call is independent: it opens its own partner session, uses the nonce it was given once, and keeps no state
/// afterwards. Calls can run concurrently.
pub struct VoucherFlowApi<B> {
    gateway: B,
}

impl<B> Debug for VoucherFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VoucherFlowApi")
    }
}

impl<B> Clone for VoucherFlowApi<B>
where B: PartnerGateway + Clone
{
    fn clone(&self) -> Self {
        Self { gateway: self.gateway.clone() }
    }
}

impl<B> VoucherFlowApi<B>
where B: PartnerGateway
{
    pub fn new(gateway: B) -> Self {
        Self { gateway }
    }

    /// Fetches voucher `id` and checks that it can be redeemed.
    ///
    /// The checks run in order, and the first failure is reported:
    /// 1. The partner must accept the request (`upstreamResponse` otherwise).
    /// 2. The voucher must not have expired (`expired`).
    /// 3. The voucher must not have been used (`used`).
    pub async fn get(&self, id: Option<String>) -> Result<OperationResult<Voucher>, VoucherFlowError> {
        let context = RequestContext::Get { id: id.clone() };
        debug!("🎟️ Processing {context}");
        let reply = match self.gateway.fetch_voucher(id).await {
            Ok(reply) => reply,
            Err(e) => return interpret_partner_error(context, e),
        };
        let voucher = match reply {
            UpstreamReply::Accepted(VoucherEnvelope { voucher }) => voucher,
            UpstreamReply::Rejected(envelope) => {
                info!("🎟️ Partner rejected {context}. Response: {envelope}");
                return Ok(OperationResult::Failure(Failure::UpstreamResponse(envelope)));
            },
        };
        match check_voucher(&voucher, Utc::now()) {
            Some(failure) => {
                info!("🎟️ {context} is not redeemable: {}", failure.reason().unwrap_or("unknown"));
                Ok(OperationResult::Failure(failure))
            },
            None => {
                info!("🎟️ {context} is valid");
                Ok(OperationResult::Success(voucher))
            },
        }
    }

    /// Redeems `vouchers` against a cart of `cart_amount`.
    ///
    /// An amount of `None` (the caller's input was not a number) is passed on to the partner as-is; it is the
    /// partner's call to reject it.
    pub async fn use_vouchers(
        &self,
        cart_amount: Option<i64>,
        vouchers: Vec<String>,
    ) -> Result<OperationResult<()>, VoucherFlowError> {
        let context = RequestContext::Use { cart_amount, vouchers: vouchers.clone() };
        debug!("🎟️ Processing {context}");
        match self.gateway.use_vouchers(cart_amount, vouchers).await {
            Ok(UpstreamReply::Accepted(_)) => {
                info!("🎟️ {context} succeeded");
                Ok(OperationResult::Success(()))
            },
            Ok(UpstreamReply::Rejected(envelope)) => {
                warn!("🎟️ Partner rejected {context}. Response: {envelope}");
                Ok(OperationResult::Failure(Failure::UpstreamResponse(envelope)))
            },
            Err(e) => interpret_partner_error(context, e),
        }
    }
}
