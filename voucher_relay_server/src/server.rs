use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use partner_api::PartnerApi;
use voucher_engine::VoucherFlowApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{configure_voucher_routes, health, not_found},
};

/// Builds the partner client and, unless `skip_preflight` is set, loads the signing key so that a bad `API_SECRET`
/// stops the server before it accepts any calls.
pub fn preflight_check(config: &ServerConfig) -> Result<PartnerApi, ServerError> {
    let api = PartnerApi::new(config.partner.clone())?;
    if config.skip_preflight {
        warn!("🔐️ Skipping the signing key check. The key will be loaded on the first voucher call.");
    } else {
        let key = api.signing_key()?;
        info!("🔐️ Partner signing key loaded. Public key: {}", key.public_key_hex());
    }
    info!("🔐️ Relaying voucher calls to {}", api.config().api_url);
    Ok(api)
}

pub async fn run_server(config: ServerConfig, api: PartnerApi) -> Result<(), ServerError> {
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(ServerError::from)
}

pub fn create_server_instance(config: ServerConfig, api: PartnerApi) -> Result<Server, ServerError> {
    let route_prefix = config.route_prefix.clone();
    let srv = HttpServer::new(move || {
        let vouchers_api = VoucherFlowApi::new(api.clone());
        let voucher_scope = web::scope(&route_prefix).configure(configure_voucher_routes::<PartnerApi>);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vr::access_log"))
            .app_data(web::Data::new(vouchers_api))
            .service(health)
            .service(voucher_scope)
            .default_service(web::route().to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
