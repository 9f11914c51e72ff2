mod keyring;
mod signer;
mod verifier;


pub use keyring::JwkKeyring;
pub use signer::{sign, Algorithm};
pub use verifier::{jwk_to_public_key, verify, verify_with_algorithm, verify_with_key};

use crate::codec::{assemble_token, build_signing_input, decode, TOKEN_DELIMITER};
use crate::config::IssuerConfig;
use crate::encoding::{
    Base64Decoder, Base64Encoder, JsonDecoder, JsonEncoder, SerdeJson, StandardBase64,
};
use crate::error::Result;
use crate::models::{now, Header, JoseHeader, Payload, Token};
use jwt::Store;
use std::marker::PhantomData;

/// Create a signed token from a header and payload.
///
/// The header's `alg` selects the signing algorithm. All three segments are base64url-encoded
/// without padding. Does not include any `bearer` prefix.
///
/// # Errors
///
/// Propagates JSON capability errors, and signing errors as described in [`sign`].
pub fn token<H, P, J, B>(header: &H, payload: &P, secret: &str, json: &J, base64: &B) -> Result<String>
where
    H: JoseHeader,
    J: JsonEncoder<H, P>,
    B: Base64Encoder + Base64Decoder,
{
    let signing_input = build_signing_input(header, payload, json, base64)?;
    let signature = sign(header.algorithm(), secret, &signing_input, base64)?;

    Ok(assemble_token(&signing_input, &signature, |bytes| {
        base64.encode_url_safe(bytes)
    }))
}

/// Issues provider tokens for a single signing key.
pub struct JwtIssuer<J = SerdeJson, B = StandardBase64> {
    config: IssuerConfig,
    json: J,
    base64: B,
}

impl JwtIssuer {
    pub fn new(config: IssuerConfig) -> Self {
        Self::with_capabilities(config, SerdeJson, StandardBase64)
    }

    /// Create an issuer configured from the environment; see [`IssuerConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(IssuerConfig::from_env()?))
    }
}

impl<J, B> JwtIssuer<J, B>
where
    B: Base64Encoder + Base64Decoder,
{
    pub fn with_capabilities(config: IssuerConfig, json: J, base64: B) -> Self {
        Self {
            config,
            json,
            base64,
        }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// The header every token from this issuer carries.
    pub fn header(&self) -> Header {
        Header::with_algorithm(self.config.algorithm().name(), self.config.key_id())
    }

    /// Issue a token timestamped now.
    pub fn issue(&self) -> Result<String>
    where
        J: JsonEncoder<Header, Payload>,
    {
        self.issue_at(now())
    }

    pub fn issue_at(&self, iat: i64) -> Result<String>
    where
        J: JsonEncoder<Header, Payload>,
    {
        self.issue_payload(&Payload::issued_at(self.config.issuer(), iat))
    }

    /// Issue a token timestamped now, carrying extension claims alongside `iss` and `iat`.
    pub fn issue_with<C>(&self, claims: C) -> Result<String>
    where
        J: JsonEncoder<Header, Payload<C>>,
    {
        self.issue_payload(&Payload::with_claims(self.config.issuer(), now(), claims))
    }

    fn issue_payload<P>(&self, payload: &P) -> Result<String>
    where
        J: JsonEncoder<Header, P>,
    {
        let result = token(
            &self.header(),
            payload,
            self.config.private_key(),
            &self.json,
            &self.base64,
        );

        match &result {
            Ok(_) => log::debug!(
                "Issued {} token for key {}",
                self.config.algorithm(),
                self.config.key_id()
            ),
            Err(e) => log::error!("Unable to issue token for key {}: {}", self.config.key_id(), e),
        }

        result
    }
}

/// Verifies tokens against a key ring, selecting the key by the header's `kid`.
///
/// The header is read with the injected JSON capability as `H`, so custom header types work as
/// long as they implement [`JoseHeader`]. `P` is only materialized by [`JwtVerifier::decode_verified`].
pub struct JwtVerifier<H = Header, P = Payload, J = SerdeJson, B = StandardBase64> {
    keyring: JwkKeyring,
    json: J,
    base64: B,
    types: PhantomData<fn() -> (H, P)>,
}

impl JwtVerifier {
    pub fn new(keyring: JwkKeyring) -> Self {
        Self::with_capabilities(keyring, SerdeJson, StandardBase64)
    }
}

impl<H, P, J, B> JwtVerifier<H, P, J, B>
where
    H: JoseHeader,
    J: JsonDecoder<H, P>,
    B: Base64Decoder,
{
    pub fn with_capabilities(keyring: JwkKeyring, json: J, base64: B) -> Self {
        Self {
            keyring,
            json,
            base64,
            types: PhantomData,
        }
    }

    pub fn keyring(&self) -> &JwkKeyring {
        &self.keyring
    }

    /// `true` only if the header names a known key and the signature checks out against it.
    pub fn verify(&self, token: &str) -> bool {
        let header = match self.header(token) {
            Some(header) => header,
            None => return false,
        };

        let kid = match header.key_id() {
            Some(kid) => kid,
            None => {
                log::debug!("Token header carries no key id");
                return false;
            }
        };

        match self.keyring.get(kid) {
            Some(key) => verify_with_key(token, key, &self.base64),
            None => {
                log::debug!("No key with id {} in the key ring", kid);
                false
            }
        }
    }

    /// Verify the token, then decode it. `None` if verification fails or the token does not
    /// decode into `H` and `P`.
    pub fn decode_verified(&self, token: &str) -> Option<Token<H, P>> {
        if !self.verify(token) {
            return None;
        }

        match decode(token, &self.json, &self.base64) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::debug!("Verified token does not decode: {}", e);
                None
            }
        }
    }

    fn header(&self, token: &str) -> Option<H> {
        let segment = token.split(TOKEN_DELIMITER).next()?;

        let json = match self.base64.decode(segment.as_bytes()).map(String::from_utf8) {
            Ok(Ok(json)) => json,
            _ => {
                log::debug!("Token header is not base64-encoded UTF-8");
                return None;
            }
        };

        match self.json.header_from(&json) {
            Ok(header) => Some(header),
            Err(e) => {
                log::debug!("Unable to read token header: {}", e);
                None
            }
        }
    }
}
