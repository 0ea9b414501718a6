use std::fmt::Display;

use url::form_urlencoded;
use vr_common::parse_int_prefix;

/// The query parameters of the voucher routes, read the way storefront frameworks send them.
///
/// `vouchers[]` may repeat; plain `vouchers` is accepted too. A missing list is empty. For single-valued parameters
/// the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherQuery {
    pub id: Option<String>,
    pub cart_amount: Option<String>,
    pub vouchers: Vec<String>,
}

impl VoucherQuery {
    pub fn parse(query: &str) -> Self {
        let mut result = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "id" if result.id.is_none() => result.id = Some(value.into_owned()),
                "cartAmount" if result.cart_amount.is_none() => result.cart_amount = Some(value.into_owned()),
                "vouchers[]" | "vouchers" => result.vouchers.push(value.into_owned()),
                _ => {},
            }
        }
        result
    }

    /// The cart amount as an integer. `None` when it is missing or not a number.
    pub fn cart_amount(&self) -> Option<i64> {
        self.cart_amount.as_deref().and_then(parse_int_prefix)
    }
}

impl Display for VoucherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id={}, cartAmount={}, vouchers=[{}]",
            self.id.as_deref().unwrap_or("-"),
            self.cart_amount.as_deref().unwrap_or("-"),
            self.vouchers.join(", ")
        )
    }
}
