//! # Request signing key
//!
//! Every signed call to the partner uses the same Ed25519 key, derived from the `API_SECRET` configuration value.
//! The key is built the first time it is needed and cached in the [`KeyManager`] for the life of the process.
//!
//! `API_SECRET` is base64 and holds either the 32-byte seed, or the 64-byte `seed || public key` pair that libsodium
//! produces. In the latter case the public half must match the key derived from the seed.

use std::fmt::{self, Debug};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use ed25519_dalek::{SigningKey, VerifyingKey, KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use log::*;
use once_cell::sync::OnceCell;
use vr_common::Secret;

use crate::{paseto::sign_v2_public, PartnerApiError};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

pub struct PartnerSigningKey {
    key: SigningKey,
}

impl PartnerSigningKey {
    pub fn from_base64_secret(secret: &str) -> Result<Self, PartnerApiError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(PartnerApiError::Configuration("API_SECRET is empty".into()));
        }
        let bytes = STANDARD_LENIENT
            .decode(secret)
            .or_else(|_| URL_SAFE_LENIENT.decode(secret))
            .map_err(|e| PartnerApiError::Configuration(format!("API_SECRET is not valid base64. {e}")))?;
        let key = match bytes.len() {
            SECRET_KEY_LENGTH => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(&bytes);
                SigningKey::from_bytes(&seed)
            },
            KEYPAIR_LENGTH => {
                let mut keypair = [0u8; KEYPAIR_LENGTH];
                keypair.copy_from_slice(&bytes);
                SigningKey::from_keypair_bytes(&keypair).map_err(|e| {
                    PartnerApiError::Configuration(format!(
                        "API_SECRET contains a public key that does not match its seed. {e}"
                    ))
                })?
            },
            n => {
                return Err(PartnerApiError::Configuration(format!(
                    "API_SECRET must decode to {SECRET_KEY_LENGTH} or {KEYPAIR_LENGTH} bytes, not {n}"
                )))
            },
        };
        Ok(Self { key })
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }

    /// Produces a `v2.public` token over `message`.
    pub fn sign(&self, message: &[u8]) -> String {
        sign_v2_public(&self.key, message)
    }
}

impl Debug for PartnerSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartnerSigningKey({})", self.public_key_hex())
    }
}

/// Owns the signing secret and the key derived from it. The key is derived at most once, even when several requests
/// ask for it at the same time.
pub struct KeyManager {
    secret: Secret<String>,
    key: OnceCell<PartnerSigningKey>,
}

impl Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager").field("initialized", &self.key.get().is_some()).finish()
    }
}

impl KeyManager {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret, key: OnceCell::new() }
    }

    pub fn signing_key(&self) -> Result<&PartnerSigningKey, PartnerApiError> {
        self.key.get_or_try_init(|| {
            let key = PartnerSigningKey::from_base64_secret(self.secret.reveal())?;
            info!("🔐️ Signing key loaded. Public key: {}", key.public_key_hex());
            Ok(key)
        })
    }
}
