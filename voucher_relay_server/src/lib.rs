//! # Voucher relay server
//! The HTTP front of the voucher relay. Merchant storefronts call it to look up and redeem vouchers; it relays each
//! call to the partner's voucher API as a signed request and answers with the outcome.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `{ROUTE_PREFIX}/voucher/get?id=..`: Fetches a voucher and checks that it can be redeemed.
//! * `{ROUTE_PREFIX}/voucher/use?cartAmount=..&vouchers[]=..`: Redeems vouchers against a cart.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
