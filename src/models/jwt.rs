use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The algorithm used when a header is created without an explicit one.
pub const DEFAULT_ALGORITHM: &str = "ES256";

/// Read access to the header fields the signer and the key ring need.
///
/// Implemented by [`Header`]; custom header types implement it to be usable with
/// [`crate::token`] and [`crate::auth::JwtVerifier`].
pub trait JoseHeader {
    /// The `alg` field, naming the signing algorithm.
    fn algorithm(&self) -> &str;

    /// The `kid` field, identifying the signing key.
    fn key_id(&self) -> Option<&str>;
}

/// The JWT header for provider tokens.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Header {
    /// The `alg` field, the signing algorithm; defaults to `ES256`.
    #[serde(default = "default_algorithm")]
    pub alg: String,
    /// The `kid` field, the identifier of the key which signed the token.
    pub kid: String,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

impl Header {
    /// Create an `ES256` header for the given key id.
    pub fn new<S: Into<String>>(kid: S) -> Self {
        Self {
            alg: default_algorithm(),
            kid: kid.into(),
        }
    }

    pub fn with_algorithm<A: Into<String>, S: Into<String>>(alg: A, kid: S) -> Self {
        Self {
            alg: alg.into(),
            kid: kid.into(),
        }
    }
}

impl JoseHeader for Header {
    fn algorithm(&self) -> &str {
        self.alg.as_ref()
    }

    fn key_id(&self) -> Option<&str> {
        Some(self.kid.as_ref())
    }
}

/// An empty set of extension claims, the default for [`Payload`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NoClaims {}

/// The JWT payload: issuer and issued-at, plus any extension claims `C`.
///
/// Extension claims are flattened into the same JSON object after `iss` and `iat`:
///
/// ```rust
/// use provider_jwt::Payload;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Subject {
///     sub: String,
/// }
///
/// let payload = Payload::with_claims("TEAM", 1516239022, Subject { sub: "me".into() });
/// let json = serde_json::to_string(&payload).unwrap();
///
/// assert_eq!(r#"{"iss":"TEAM","iat":1516239022,"sub":"me"}"#, json);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payload<C = NoClaims> {
    /// The `iss` field, the issuer of the token (for instance a team identifier).
    pub iss: String,
    /// The `iat` field, when the token was issued as a UTC Unix timestamp in seconds.
    pub iat: i64,
    #[serde(flatten)]
    pub claims: C,
}

impl Payload<NoClaims> {
    /// Create a payload issued now.
    pub fn new<S: Into<String>>(iss: S) -> Self {
        Self::issued_at(iss, now())
    }

    pub fn issued_at<S: Into<String>>(iss: S, iat: i64) -> Self {
        Self::with_claims(iss, iat, NoClaims::default())
    }
}

impl<C> Payload<C> {
    pub fn with_claims<S: Into<String>>(iss: S, iat: i64, claims: C) -> Self {
        Self {
            iss: iss.into(),
            iat,
            claims,
        }
    }
}

/// A decoded token. Produced by [`crate::codec::decode`], which never verifies the signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<H = Header, P = Payload> {
    header: H,
    payload: P,
    signature: Option<Vec<u8>>,
}

impl<H, P> Token<H, P> {
    pub(crate) fn new(header: H, payload: P, signature: Option<Vec<u8>>) -> Self {
        Self {
            header,
            payload,
            signature,
        }
    }

    pub fn header(&self) -> &H {
        &self.header
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The raw signature bytes, present only when the token had exactly three segments.
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub fn into_parts(self) -> (H, P, Option<Vec<u8>>) {
        (self.header, self.payload, self.signature)
    }
}

/// The current time as a UTC Unix timestamp in seconds.
pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
