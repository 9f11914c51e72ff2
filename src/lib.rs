//! Issue and verify compact JSON Web Tokens for provider-assertion flows.
//!
//! Tokens are minted with an EC (`ES256`) or RSA (`RS256`) private key given as a base64
//! PKCS#8 string, and verified against RSA public keys published as JWKs.
//!
//! ```rust,no_run
//! use provider_jwt::{IssuerConfig, JwtIssuer};
//!
//! let issuer = JwtIssuer::new(IssuerConfig::new("TEAMID", "KEYID", "MIGTAgEAMBMGByqGSM49..."));
//! let bearer = format!("bearer {}", issuer.issue().unwrap());
//! ```
//!
//! JSON and base64 handling are injected through the traits in [`encoding`], so the codec works
//! with any header and payload types; [`SerdeJson`] and [`StandardBase64`] cover the common case.

pub mod auth;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod models;

pub use auth::{
    jwk_to_public_key, sign, token, verify, verify_with_algorithm, verify_with_key, Algorithm,
    JwkKeyring, JwtIssuer, JwtVerifier,
};
pub use codec::{assemble_token, build_signing_input, decode};
pub use config::IssuerConfig;
pub use encoding::{Base64Decoder, Base64Encoder, JsonDecoder, JsonEncoder, SerdeJson, StandardBase64};
pub use error::{Error, Result};
pub use models::{Header, JoseHeader, Jwk, JwkSet, NoClaims, Payload, Token};
