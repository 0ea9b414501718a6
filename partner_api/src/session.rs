use std::fmt::{self, Debug};

use reqwest::Client;

/// A single-use token handed out by the partner's nonce handshake.
///
/// `Nonce` is deliberately not `Clone`: building a signed request consumes it, so each nonce ends up in exactly one
/// request.
#[derive(PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", self.0)
    }
}

/// An HTTP client with its own cookie jar, together with the nonce the partner issued to it.
///
/// The partner ties the nonce to the session cookie it set during the handshake, so the signed request that uses the
/// nonce has to go out through the same client. Sessions are created per operation and never shared.
pub struct PartnerSession {
    client: Client,
    nonce: Nonce,
}

impl PartnerSession {
    pub(crate) fn new(client: Client, nonce: Nonce) -> Self {
        Self { client, nonce }
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn into_parts(self) -> (Client, Nonce) {
        (self.client, self.nonce)
    }
}

impl Debug for PartnerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerSession").field("nonce", &self.nonce).finish()
    }
}
