use mockall::mock;
use partner_api::{PartnerApiError, UpstreamReply, VoucherEnvelope};
use serde_json::Value;
use voucher_engine::traits::PartnerGateway;

mock! {
    pub Gateway {}
    impl PartnerGateway for Gateway {
        async fn fetch_voucher(&self, id: Option<String>) -> Result<UpstreamReply<VoucherEnvelope>, PartnerApiError>;
        async fn use_vouchers(&self, cart_amount: Option<i64>, vouchers: Vec<String>) -> Result<UpstreamReply<Value>, PartnerApiError>;
    }
}
