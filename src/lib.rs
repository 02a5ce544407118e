//! signed-url library: time-limited HMAC-SHA256 signed URLs.
//!
//! This crate builds URLs of the form
//! `<host><path>?access_key_id=..&expires=..&signature=..` and checks
//! presented URLs against the same credentials and an expiry time.  It does
//! no I/O; an HTTP server or CDN edge calls into it with plain function
//! calls.

pub mod config;
pub mod errors;
pub mod expires;
pub mod generator;
pub mod signer;
pub mod validator;

pub use config::SigningConfig;
pub use errors::SignedUrlError;
pub use expires::Expires;
pub use generator::Generator;
pub use signer::UrlEncoder;
pub use validator::{validate, validate_at, ValidationRequest};
