//! HMAC-SHA256 URL signing.
//!
//! A signed URL is the caller's host and path followed by three query
//! parameters:
//!
//! ```text
//! <host><path>?access_key_id=<key_id>&expires=<epoch-seconds>&signature=<signature>
//! ```
//!
//! The signature is computed as follows:
//! 1. Build the canonical string `GET\n\n\n<expires>\n/<path>`
//! 2. HMAC-SHA256 it with the shared secret
//! 3. Base64-encode the digest (standard alphabet, padded)
//! 4. Percent-escape `+`, `/` and `=` in the base64 text
//!
//! The canonical string is the interoperability contract with every
//! previously issued URL and must stay byte-exact.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::SigningConfig;
use crate::expires::Expires;

type HmacSha256 = Hmac<Sha256>;

/// HTTP method baked into every canonical string.
const SIGNED_METHOD: &str = "GET";

/// Characters of the base64 alphabet that must be escaped in the query string.
const SIGNATURE_ESCAPE: &AsciiSet = &CONTROLS.add(b'+').add(b'/').add(b'=');

// ── Canonical string ────────────────────────────────────────────────

/// Build the string that gets signed.
///
/// ```text
/// GET + '\n' +
/// Content-MD5 (always empty) + '\n' +
/// Content-Type (always empty) + '\n' +
/// Expires + '\n' +
/// '/' + Path
/// ```
///
/// `path` is used verbatim; a path that already starts with `/` produces
/// `//...`.
pub fn canonical_string(expires: Expires, path: &str) -> String {
    format!("{SIGNED_METHOD}\n\n\n{expires}\n/{path}")
}

// ── Signature computation ───────────────────────────────────────────

/// Compute HMAC-SHA256.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Turn raw digest bytes into the query-safe signature token.
pub fn encode_signature(digest: &[u8]) -> String {
    let encoded = BASE64_STANDARD.encode(digest);
    utf8_percent_encode(encoded.trim(), SIGNATURE_ESCAPE).to_string()
}

/// Compute the escaped signature for `path` expiring at `expires`.
pub fn compute_signature(secret: &str, expires: Expires, path: &str) -> String {
    let canonical = canonical_string(expires, path);
    let digest = hmac_sha256(secret.as_bytes(), canonical.as_bytes());
    encode_signature(&digest)
}

/// Compare two strings in constant time.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

// ── URL assembly ────────────────────────────────────────────────────

/// Concatenate the final URL. No encoding is applied to any part; the
/// parameter order is fixed.
pub fn assemble_url(
    host: &str,
    path: &str,
    access_key_id: &str,
    expires: Expires,
    signature: &str,
) -> String {
    format!("{host}{path}?access_key_id={access_key_id}&expires={expires}&signature={signature}")
}

// ── Encoder ─────────────────────────────────────────────────────────

/// Signs paths with a fixed set of credentials.
///
/// The encoder does not validate its configuration: an empty secret still
/// produces a (weak) signature.
#[derive(Debug, Clone)]
pub struct UrlEncoder {
    config: SigningConfig,
}

impl UrlEncoder {
    /// Create an encoder for the given credentials.
    pub fn new(config: SigningConfig) -> Self {
        Self { config }
    }

    /// The credentials this encoder signs with.
    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Produce the signed URL for `path` expiring at `expires`.
    pub fn encode(&self, path: &str, expires: impl Into<Expires>) -> String {
        let expires = expires.into();
        let signature = compute_signature(&self.config.secret, expires, path);
        assemble_url(
            &self.config.host,
            path,
            &self.config.key_id,
            expires,
            &signature,
        )
    }
}

// ── Tests ───────────────────────────────────────────────────────────
