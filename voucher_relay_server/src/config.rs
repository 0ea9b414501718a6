//! Server configuration
//!
//! | Variable            | Meaning                                              | Default      |
//! |---------------------|------------------------------------------------------|--------------|
//! | `LISTEN_HOST`       | The address the server binds to                      | `0.0.0.0`    |
//! | `LISTEN`            | The port the server binds to                         | `80`         |
//! | `ROUTE_PREFIX`      | The path prefix for the voucher routes               | `/smarketoo` |
//! | `VR_SKIP_PREFLIGHT` | Skip loading the signing key before accepting calls  | `false`      |
//!
//! The partner connection (`API_URL`, `API_KEY`, `API_SECRET`) is read by [`PartnerConfig`].
use std::env;

use log::*;
use partner_api::PartnerConfig;
use vr_common::parse_boolean_flag;

const DEFAULT_VR_HOST: &str = "0.0.0.0";
const DEFAULT_VR_PORT: u16 = 80;
const DEFAULT_ROUTE_PREFIX: &str = "/smarketoo";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path prefix the voucher routes are mounted under. Always starts with `/` and never ends with one, or is empty.
    pub route_prefix: String,
    /// If true, the signing key is only loaded on the first voucher call instead of at startup.
    pub skip_preflight: bool,
    pub partner: PartnerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_VR_HOST.into(),
            port: DEFAULT_VR_PORT,
            route_prefix: DEFAULT_ROUTE_PREFIX.into(),
            skip_preflight: false,
            partner: PartnerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("LISTEN_HOST").ok().unwrap_or_else(|| DEFAULT_VR_HOST.into());
        let port = env::var("LISTEN")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for LISTEN. {e} Using the default, {DEFAULT_VR_PORT}, instead.");
                    DEFAULT_VR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_VR_PORT);
        let route_prefix = env::var("ROUTE_PREFIX")
            .map(|s| normalize_route_prefix(&s))
            .ok()
            .unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.into());
        let skip_preflight = parse_boolean_flag(env::var("VR_SKIP_PREFLIGHT").ok(), false);
        if skip_preflight {
            warn!("🪛️ VR_SKIP_PREFLIGHT is set. A bad API_SECRET will only show up on the first voucher call.");
        }
        let partner = PartnerConfig::new_from_env_or_default();
        Self { host, port, route_prefix, skip_preflight, partner }
    }
}

/// Brings a user-supplied prefix into the `/a/b` form actix scopes expect. `"/"` and `""` mount the routes at the root.
pub fn normalize_route_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn route_prefixes() {
        assert_eq!(normalize_route_prefix("/smarketoo"), "/smarketoo");
        assert_eq!(normalize_route_prefix("smarketoo/"), "/smarketoo");
        assert_eq!(normalize_route_prefix(" /shop/vouchers/ "), "/shop/vouchers");
        assert_eq!(normalize_route_prefix("/"), "");
        assert_eq!(normalize_route_prefix(""), "");
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 80);
        assert_eq!(config.route_prefix, "/smarketoo");
        assert!(!config.skip_preflight);
    }
}
