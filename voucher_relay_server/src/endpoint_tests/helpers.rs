use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use log::debug;

use crate::routes::{health, not_found};

pub const PREFIX: &str = "/smarketoo";

/// Sends a GET request to an app laid out like the real server: `/health` at the root, the routes added by
/// `configure` under [`PREFIX`], and the `null` 404 for everything else.
pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new()
        .service(health)
        .service(web::scope(PREFIX).configure(configure))
        .default_service(web::route().to(not_found));
    let service = test::init_service(app).await;
    debug!("Making request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
