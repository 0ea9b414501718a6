use chrono::{DateTime, Utc};
use log::*;
use partner_api::Voucher;

use crate::Failure;

/// Checks that a voucher the partner returned can still be redeemed at `now`.
///
/// Expiry is checked before use, so a voucher that is both expired and used is reported as expired. A voucher whose
/// expiration date cannot be read is treated as not expired; the partner remains the authority on redemption.
pub fn check_voucher(voucher: &Voucher, now: DateTime<Utc>) -> Option<Failure> {
    match voucher.expires_at() {
        Some(expiry) if expiry < now => {
            debug!("🎟️ Voucher expired at {expiry}");
            return Some(Failure::Expired);
        },
        None if voucher.expiration_date.as_ref().is_some_and(|d| !d.is_null()) => {
            let date = voucher.expiration_date.as_ref().map(ToString::to_string).unwrap_or_default();
            warn!("🎟️ Could not read voucher expiration date {date}");
        },
        _ => {},
    }
    if voucher.is_used() {
        debug!("🎟️ Voucher has already been used");
        return Some(Failure::Used);
    }
    None
}
