use partner_api::{PartnerApi, PartnerApiError, UpstreamReply, VoucherEnvelope};
use serde_json::Value;

/// The calls the voucher engine needs from the partner. Each call is a complete signed exchange: handshake, signed
/// request, and envelope classification.
#[allow(async_fn_in_trait)]
pub trait PartnerGateway {
    async fn fetch_voucher(&self, id: Option<String>) -> Result<UpstreamReply<VoucherEnvelope>, PartnerApiError>;
    async fn use_vouchers(
        &self,
        cart_amount: Option<i64>,
        vouchers: Vec<String>,
    ) -> Result<UpstreamReply<Value>, PartnerApiError>;
}

impl PartnerGateway for PartnerApi {
    async fn fetch_voucher(&self, id: Option<String>) -> Result<UpstreamReply<VoucherEnvelope>, PartnerApiError> {
        PartnerApi::fetch_voucher(self, id.as_deref()).await
    }

    async fn use_vouchers(
        &self,
        cart_amount: Option<i64>,
        vouchers: Vec<String>,
    ) -> Result<UpstreamReply<Value>, PartnerApiError> {
        PartnerApi::use_vouchers(self, cart_amount, &vouchers).await
    }
}
