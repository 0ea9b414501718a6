use actix_web::{http::StatusCode, web, web::ServiceConfig};
use mockall::predicate::eq;
use partner_api::{PartnerApiError, UpstreamReply};
use serde_json::{json, Value};
use voucher_engine::VoucherFlowApi;

use super::{helpers::get_request, mocks::MockGateway};
use crate::routes::configure_voucher_routes;

fn as_json(body: &str) -> Value {
    serde_json::from_str(body).expect("Response is not JSON")
}

fn mount(cfg: &mut ServiceConfig, gateway: MockGateway) {
    cfg.configure(configure_voucher_routes::<MockGateway>)
        .app_data(web::Data::new(VoucherFlowApi::new(gateway)));
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/health", |_| {}).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn unknown_paths_are_null_404s() {
    let _ = env_logger::try_init().ok();
    for path in ["/voucher/get?id=v1", "/smarketoo/voucher/delete", "/nope"] {
        let (status, body) = get_request(path, configure_valid_voucher).await.expect("Request failed");
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, "null", "{path}");
    }
}

#[actix_web::test]
async fn get_valid_voucher() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request("/smarketoo/voucher/get?id=v1", configure_valid_voucher).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"success": true, "voucher": valid_voucher()}));
}

#[actix_web::test]
async fn get_expired_voucher() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_voucher().returning(|_| {
            UpstreamReply::from_envelope(json!({
                "success": true,
                "voucher": {"expirationDate": "2000-01-01T00:00:00Z", "isUsed": true}
            }))
        });
        mount(cfg, gateway);
    }
    let (status, body) = get_request("/smarketoo/voucher/get?id=old", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"success": false, "reason": "expired"}));
}

#[actix_web::test]
async fn get_partner_down() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_voucher().returning(|_| {
            Err(PartnerApiError::Transport {
                status: Some(503),
                message: "service unavailable".into(),
                body: Some(json!({"success": false, "error": "MAINTENANCE"})),
            })
        });
        mount(cfg, gateway);
    }
    let (status, body) = get_request("/smarketoo/voucher/get?id=v1", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body), json!({"success": false, "upstreamError": {"success": false, "error": "MAINTENANCE"}}));
}

#[actix_web::test]
async fn use_vouchers_passes_query_through() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway
            .expect_use_vouchers()
            .with(eq(Some(100)), eq(vec!["v1".to_string(), "v2".to_string()]))
            .times(1)
            .returning(|_, _| Ok(UpstreamReply::Accepted(json!({"success": true}))));
        mount(cfg, gateway);
    }
    let (status, body) = get_request("/smarketoo/voucher/use?cartAmount=100&vouchers[]=v1&vouchers[]=v2", configure)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true}"#);
}

#[actix_web::test]
async fn use_vouchers_rejected() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut gateway = MockGateway::new();
        gateway
            .expect_use_vouchers()
            .with(eq(None::<i64>), eq(vec!["v1".to_string()]))
            .times(1)
            .returning(|_, _| Ok(UpstreamReply::Rejected(json!({"success": false, "error": "INVALID_CART"}))));
        mount(cfg, gateway);
    }
    let (status, body) =
        get_request("/smarketoo/voucher/use?cartAmount=abc&vouchers[]=v1", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({"success": false, "upstreamResponse": {"success": false, "error": "INVALID_CART"}})
    );
}

fn valid_voucher() -> Value {
    json!({"id": "v1", "code": "SUMMER", "expirationDate": "2099-12-31T23:59:59Z", "isUsed": false, "discount": 10})
}

fn configure_valid_voucher(cfg: &mut ServiceConfig) {
    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_voucher()
        .with(eq(Some("v1".to_string())))
        .returning(|_| UpstreamReply::from_envelope(json!({"success": true, "voucher": valid_voucher()})));
    mount(cfg, gateway);
}
