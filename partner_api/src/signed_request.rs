//! # Signed request bodies
//!
//! Signed calls to the partner carry a JSON body and an `x-signature` header. The body holds the operation's own
//! fields, followed by `apiKey` and the session `nonce`:
//!
//! ```text
//!    {"id":"v1","apiKey":"key-1","nonce":"n-1"}
//! ```
//!
//! The signature is produced in two steps, and the partner verifies it the same way:
//!   1. `hash = hex(SHA-256(body))`, lowercase.
//!   2. `x-signature = v2.public PASETO token over the UTF-8 bytes of hash`.
//!
//! Note that the token signs the hex string, not the raw digest and not the body. The body is serialized exactly once
//! and those bytes are what get hashed and what get sent.

use log::*;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{key_manager::PartnerSigningKey, session::Nonce, PartnerApiError};

#[derive(Serialize)]
struct SignedPayload<'a, T: Serialize> {
    #[serde(flatten)]
    fields: &'a T,
    #[serde(rename = "apiKey")]
    api_key: &'a str,
    nonce: &'a str,
}

#[derive(Debug, Clone)]
pub struct SignedRequest {
    body: Vec<u8>,
    content_hash: String,
    signature: String,
}

impl SignedRequest {
    pub fn build<T: Serialize>(
        key: &PartnerSigningKey,
        fields: &T,
        api_key: &str,
        nonce: Nonce,
    ) -> Result<Self, PartnerApiError> {
        let payload = SignedPayload { fields, api_key, nonce: nonce.as_str() };
        let body = serde_json::to_vec(&payload).map_err(|e| PartnerApiError::JsonError(e.to_string()))?;
        let content_hash = sha256_hex(&body);
        let signature = key.sign(content_hash.as_bytes());
        trace!("🔐️ Signed request body with hash {content_hash}");
        Ok(Self { body, content_hash, signature })
    }

    /// The canonical body. These are the bytes that were hashed, and they must be sent unchanged.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The value for the `x-signature` header
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.body, self.signature)
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        data_objects::{FetchVoucherRequest, UseVouchersRequest},
        paseto::verify_v2_public,
    };

    // RFC 8032, test 1
    const SEED_B64: &str = "nWGxne/9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A=";

    fn key() -> PartnerSigningKey {
        PartnerSigningKey::from_base64_secret(SEED_B64).unwrap()
    }

    #[test]
    fn sha256_hex_is_lowercase_and_deterministic() {
        assert_eq!(sha256_hex(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(sha256_hex(b"abc"), sha256_hex(b"abc"));
    }

    #[test]
    fn fetch_voucher_body_layout() {
        let fields = FetchVoucherRequest { id: Some("v1") };
        let req = SignedRequest::build(&key(), &fields, "key-1", Nonce::new("n-1")).unwrap();
        assert_eq!(std::str::from_utf8(req.body()).unwrap(), r#"{"id":"v1","apiKey":"key-1","nonce":"n-1"}"#);
        assert_eq!(req.content_hash(), "33b5ae0fb82a7a3279e78847080254bc98a47fe9d2558fd11d100054031eda15");
        // Ed25519 is deterministic, so the whole token is fixed for a fixed key and body.
        assert_eq!(
            req.signature(),
            "v2.public.MzNiNWFlMGZiODJhN2EzMjc5ZTc4ODQ3MDgwMjU0YmM5OGE0N2ZlOWQyNTU4ZmQxMWQxMDAwNTQwMzFlZGExNcQ02Ciiilwh1fckO5gMppcEg1NBUJgaVKv91OIW0NY3m2q0NwkR8bN7Qnfnm5I91bQeHTazvgWgjD3byo2oywU"
        );
    }

    #[test]
    fn missing_id_is_omitted() {
        let fields = FetchVoucherRequest { id: None };
        let req = SignedRequest::build(&key(), &fields, "key-1", Nonce::new("n-1")).unwrap();
        assert_eq!(std::str::from_utf8(req.body()).unwrap(), r#"{"apiKey":"key-1","nonce":"n-1"}"#);
    }

    #[test]
    fn use_vouchers_body_layout() {
        let vouchers = vec!["v1".to_string(), "v2".to_string()];
        let fields = UseVouchersRequest { cart_amount: Some(100), vouchers: &vouchers };
        let req = SignedRequest::build(&key(), &fields, "key-1", Nonce::new("n-2")).unwrap();
        assert_eq!(
            std::str::from_utf8(req.body()).unwrap(),
            r#"{"cartAmount":100,"vouchers":["v1","v2"],"apiKey":"key-1","nonce":"n-2"}"#
        );
        let fields = UseVouchersRequest { cart_amount: None, vouchers: &vouchers };
        let req = SignedRequest::build(&key(), &fields, "key-1", Nonce::new("n-3")).unwrap();
        assert_eq!(
            std::str::from_utf8(req.body()).unwrap(),
            r#"{"cartAmount":null,"vouchers":["v1","v2"],"apiKey":"key-1","nonce":"n-3"}"#
        );
    }

    #[test]
    fn signature_covers_the_transmitted_bytes() {
        let key = key();
        let fields = FetchVoucherRequest { id: Some("voucher-with-ünïcode/and\"quotes\"") };
        let req = SignedRequest::build(&key, &fields, "key-1", Nonce::new("abc")).unwrap();
        let (body, signature) = req.clone().into_parts();
        assert_eq!(body, req.body());
        let signed = verify_v2_public(&signature, &key.verifying_key()).expect("signature should verify");
        assert_eq!(signed, sha256_hex(&body).as_bytes());
        assert_eq!(signed, req.content_hash().as_bytes());
    }

    #[test]
    fn repeated_signatures_verify() {
        let key = key();
        let fields = FetchVoucherRequest { id: Some("v1") };
        let a = SignedRequest::build(&key, &fields, "key-1", Nonce::new("n")).unwrap();
        let b = SignedRequest::build(&key, &fields, "key-1", Nonce::new("n")).unwrap();
        assert_eq!(a.body(), b.body());
        for req in [a, b] {
            let signed = verify_v2_public(req.signature(), &key.verifying_key()).unwrap();
            assert_eq!(signed, req.content_hash().as_bytes());
        }
    }
}
