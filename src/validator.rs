//! Signed URL validation.
//!
//! Validation never parses the presented URL.  It rebuilds the URL the
//! caller *expects* from the supplied credentials, path and expiry, then
//! requires an exact string match and an expiry strictly after "now".
//! Both failure modes collapse into a single `false` so callers cannot be
//! used as an oracle for which check failed.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::SigningConfig;
use crate::expires::Expires;
use crate::signer::{constant_time_eq, UrlEncoder};

/// Everything needed to check one presented URL.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// Key identifier the URL claims to be signed with.
    pub key_id: String,
    /// Secret belonging to `key_id`.
    pub secret: String,
    /// Path exactly as it was signed.
    pub path: String,
    /// Host exactly as it was signed.
    pub host: String,
    /// Expiry exactly as it was signed.
    pub expires: Expires,
    /// The URL presented by the client.
    pub request_url: String,
}

impl ValidationRequest {
    /// The credentials this request is checked against.
    fn signing_config(&self) -> SigningConfig {
        SigningConfig::new(
            self.host.clone(),
            self.key_id.clone(),
            self.secret.clone(),
        )
    }
}

/// Validate `request` against the current UTC time.
pub fn validate(request: &ValidationRequest) -> bool {
    validate_at(request, Utc::now())
}

/// Validate `request` as of `now`.
///
/// Returns true only if the presented URL is byte-for-byte the URL this
/// crate would generate for the same inputs and `expires` is strictly after
/// `now`.
pub fn validate_at(request: &ValidationRequest, now: DateTime<Utc>) -> bool {
    // A fresh encoder per call: no shared state is read or written.
    let encoder = UrlEncoder::new(request.signing_config());
    let expected = encoder.encode(&request.path, request.expires);

    let url_matches = constant_time_eq(&request.request_url, &expected);
    let not_expired = request.expires.is_after(now);

    if !(url_matches && not_expired) {
        debug!(
            key_id = %request.key_id,
            path = %request.path,
            expires = %request.expires,
            "signed url rejected"
        );
    }

    url_matches && not_expired
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SIGNED_AT: i64 = 1_439_888_470; // 2015-08-18 09:01:10 UTC
    const REQUEST_URL: &str = "http://superhost:3000/path/to/resource/1?access_key_id=key_id&expires=1439892070&signature=s1cd1QD23Thg8QUhS94TYguz29dA67KS8eGKRH%2BpGbw%3D";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn request() -> ValidationRequest {
        ValidationRequest {
            key_id: "key_id".to_string(),
            secret: "secret".to_string(),
            path: "/path/to/resource/1".to_string(),
            host: "http://superhost:3000".to_string(),
            expires: Expires::from_secs(SIGNED_AT + 3600),
            request_url: REQUEST_URL.to_string(),
        }
    }

    #[test]
    fn test_validate_succeeds() {
        assert!(validate_at(&request(), at(SIGNED_AT - 3600)));
    }

    #[test]
    fn test_validate_fails_if_time_is_in_the_past() {
        assert!(!validate_at(&request(), at(SIGNED_AT + 3600 + 1)));
        assert!(!validate_at(&request(), at(SIGNED_AT + 7200)));
    }

    #[test]
    fn test_validate_fails_at_exact_expiry() {
        assert!(!validate_at(&request(), at(SIGNED_AT + 3600)));
        assert!(validate_at(&request(), at(SIGNED_AT + 3600 - 1)));
    }

    #[test]
    fn test_validate_fails_if_time_is_manipulated() {
        let mut req = request();
        req.expires = Expires::from_secs(SIGNED_AT + 7200);
        assert!(!validate_at(&req, at(SIGNED_AT + 3600)));
        assert!(!validate_at(&req, at(SIGNED_AT - 3600)));
    }

    #[test]
    fn test_validate_fails_if_secret_is_invalid() {
        let mut req = request();
        req.secret = "ibvalid_secret".to_string();
        assert!(!validate_at(&req, at(SIGNED_AT - 3600)));
    }

    #[test]
    fn test_validate_fails_if_key_id_is_invalid() {
        let mut req = request();
        req.key_id = "invalid_key_id".to_string();
        assert!(!validate_at(&req, at(SIGNED_AT - 3600)));
    }

    #[test]
    fn test_validate_fails_if_path_differs() {
        let mut req = request();
        req.path = "/path/to/resource/2".to_string();
        assert!(!validate_at(&req, at(SIGNED_AT - 3600)));
    }

    #[test]
    fn test_validate_fails_on_tampered_url() {
        let tampered = [
            REQUEST_URL.replace("resource/1", "resource/2"),
            REQUEST_URL.replace("expires=1439892070", "expires=1439892071"),
            REQUEST_URL.replace("s1cd1QD", "s1cd1QE"),
            REQUEST_URL.replace("%2B", "+"),
            REQUEST_URL.replace("%3D", "%3d"),
        ];
        for url in tampered {
            let mut req = request();
            req.request_url = url.clone();
            assert!(!validate_at(&req, at(SIGNED_AT - 3600)), "accepted {url}");
        }
    }

    #[test]
    fn test_validate_fails_on_reordered_params() {
        let mut req = request();
        req.request_url = "http://superhost:3000/path/to/resource/1?expires=1439892070&access_key_id=key_id&signature=s1cd1QD23Thg8QUhS94TYguz29dA67KS8eGKRH%2BpGbw%3D".to_string();
        assert!(!validate_at(&req, at(SIGNED_AT - 3600)));
    }

    #[test]
    fn test_generated_url_validates_before_expiry() {
        let config = SigningConfig::new("https://cdn.example.com", "AKID", "s3cr3t");
        let expires = Expires::from_secs(2_000_000_000);
        let url = UrlEncoder::new(config.clone()).encode("/a/b.png", expires);

        let req = ValidationRequest {
            key_id: config.key_id,
            secret: config.secret,
            path: "/a/b.png".to_string(),
            host: config.host,
            expires,
            request_url: url,
        };
        for now in [0, 1_439_888_470, 1_999_999_999] {
            assert!(validate_at(&req, at(now)));
        }
        assert!(!validate_at(&req, at(2_000_000_000)));
    }

    #[test]
    fn test_negative_expires_is_always_expired() {
        let config = SigningConfig::new("http://h", "k", "s");
        let expires = Expires::from_secs(-100);
        let req = ValidationRequest {
            key_id: "k".to_string(),
            secret: "s".to_string(),
            path: "/p".to_string(),
            host: "http://h".to_string(),
            expires,
            request_url: UrlEncoder::new(config).encode("/p", expires),
        };
        assert!(!validate(&req));
        assert!(validate_at(&req, at(-101)));
    }

    #[test]
    fn test_validate_against_wall_clock() {
        // 2015 is long past.
        assert!(!validate(&request()));
    }
}
