//! # Voucher relay API
//!
//! * [`voucher_flow_api`] is the entry point: the `get` and `use` flows.
//! * [`operation_result`] is the result type handed back to callers, and the interpretation of partner failures.
//! * [`validation`] holds the voucher lifecycle checks applied to fetched vouchers.
//! * [`errors`] holds the errors that are propagated rather than turned into results.

pub mod errors;
pub mod operation_result;
pub mod validation;
pub mod voucher_flow_api;
