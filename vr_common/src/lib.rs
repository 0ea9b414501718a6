mod helpers;
mod secret;

pub use helpers::{parse_boolean_flag, parse_int_prefix};
pub use secret::Secret;
