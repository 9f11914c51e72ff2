use openssl::error::ErrorStack;
use std::string::FromUtf8Error;
use thiserror::Error;

/// A boxed error produced by one of the injected JSON or base64 capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while issuing or decoding tokens.
///
/// Verification never produces one of these; every verification failure collapses to `false`.
#[derive(Debug, Error)]
pub enum Error {
    /// The algorithm name is not one of `ES256` or `RS256`.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The private key material could not be parsed, or is the wrong key type for the algorithm.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
    /// The JSON capability failed; the source is the capability's own error.
    #[error("JSON capability failed: {0}")]
    Json(#[source] BoxError),
    /// The base64 capability failed; the source is the capability's own error.
    #[error("base64 capability failed: {0}")]
    Base64(#[source] BoxError),
    #[error("token segment is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    /// OpenSSL failed while producing a signature from an already-parsed key.
    #[error("cryptographic operation failed: {0}")]
    Crypto(#[from] ErrorStack),
    #[error("invalid configuration for {var}: {reason}")]
    Config { var: String, reason: String },
}

impl Error {
    pub(crate) fn json<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Json(Box::new(e))
    }

    pub(crate) fn base64<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Base64(Box::new(e))
    }

    pub(crate) fn config<V: Into<String>, R: Into<String>>(var: V, reason: R) -> Self {
        Self::Config {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
