use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::PartnerApiError;

//--------------------------------------------  Requests  ----------------------------------------------------------

/// Fields for `/partner/voucher/get`. A missing id is left out of the body altogether.
#[derive(Debug, Clone, Serialize)]
pub struct FetchVoucherRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
}

/// Fields for `/partner/voucher/use`. An amount that could not be parsed goes out as `null`, and it is up to the
/// partner to reject it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseVouchersRequest<'a> {
    pub cart_amount: Option<i64>,
    pub vouchers: &'a [String],
}

//--------------------------------------------  Responses  ---------------------------------------------------------

/// The partner wraps every response in a `{"success": bool, ...}` envelope. An envelope with `success: true` is
/// decoded into `T`; anything else is kept as-is so that it can be handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamReply<T> {
    Accepted(T),
    Rejected(Value),
}

impl<T: DeserializeOwned> UpstreamReply<T> {
    pub fn from_envelope(envelope: Value) -> Result<Self, PartnerApiError> {
        if envelope_succeeded(&envelope) {
            let payload = serde_json::from_value(envelope)
                .map_err(|e| PartnerApiError::JsonError(format!("Unexpected response from partner. {e}")))?;
            Ok(Self::Accepted(payload))
        } else {
            Ok(Self::Rejected(envelope))
        }
    }
}

pub fn envelope_succeeded(envelope: &Value) -> bool {
    envelope.get("success").and_then(Value::as_bool).unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoucherEnvelope {
    pub voucher: Voucher,
}

/// A voucher as the partner describes it. Only the fields the relay inspects are picked out; everything else is
/// carried along untouched so that the voucher can be passed on exactly as it was received.
///
/// `expirationDate` and `isUsed` are kept as raw JSON. Partners are not consistent about their types (dates as strings
/// or epoch milliseconds, flags as booleans or 0/1), and a voucher must never fail to decode because of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub is_used: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Keeps an explicit `null` as `Some(Value::Null)`, so that it is written back out.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Voucher {
    /// `isUsed` by truthiness: `true`, non-zero numbers, non-empty strings, arrays and objects count as used.
    pub fn is_used(&self) -> bool {
        match &self.is_used {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Reads `expirationDate`. Numbers are epoch milliseconds. Strings may be RFC 3339, RFC 2822 (including HTTP
    /// dates), ISO 8601 with a `+hhmm` offset, or a timestamp or bare date without an offset, which is read as UTC.
    /// Returns `None` if the date is missing or unreadable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self.expiration_date.as_ref()? {
            Value::String(s) => parse_timestamp(s),
            Value::Number(n) => {
                let millis = n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
                Utc.timestamp_millis_opt(millis).single()
            },
            _ => None,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
}
