/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Lenient integer parsing for amounts coming off a query string.
///
/// Leading whitespace and an optional sign are accepted, then as many digits as are present; anything after the
/// digits is ignored, so `"12.99"` is `12` and `"42abc"` is `42`. A `0x` prefix switches to hexadecimal.
/// Returns `None` if no digits are found or the value does not fit in an `i64`. `None` is the "not a number" value;
/// callers forward it rather than rejecting it.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let end = s.find(|c: char| !c.is_digit(radix)).unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return None;
    }
    // Out-of-range amounts become "not a number" (sent as null) rather than a rounded float
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    if negative {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}
