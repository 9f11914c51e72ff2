use crate::encoding::{Base64Decoder, Base64Encoder};
use openssl::bn::BigNum;
use openssl::pkey::{HasPublic, PKey, Public};
use openssl::rsa::{Rsa, RsaRef};
use serde::{Deserialize, Serialize};

/// RSA moduli shorter than this are refused when reconstructing a key.
pub const MIN_MODULUS_BITS: i32 = 512;

/// A JSON Web Key carrying RSA public-key parameters.
///
/// For more information on the fields, [consult RFC 7517][rfc7517].
///
///  [rfc7517]: https://www.rfc-editor.org/rfc/rfc7517
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Jwk {
    /// Key type; `RSA` for the keys this crate can verify with.
    pub kty: String,
    /// The key id, matched against the `kid` field of token headers.
    pub kid: String,
    /// Key usage; `sig` for signing keys.
    #[serde(rename = "use")]
    pub key_use: String,
    /// The algorithm the key is intended for, usually `RS256`.
    pub alg: String,
    /// The modulus as an unsigned big-endian integer, base64url-encoded.
    pub n: String,
    /// The public exponent as an unsigned big-endian integer, base64url-encoded.
    pub e: String,
}

impl Jwk {
    /// Describe an RSA public key as a `sig`/`RS256` JWK with the given key id.
    pub fn from_rsa<T, S, E>(kid: S, key: &RsaRef<T>, encoder: &E) -> Self
    where
        T: HasPublic,
        S: Into<String>,
        E: Base64Encoder,
    {
        Self {
            kty: "RSA".to_string(),
            kid: kid.into(),
            key_use: "sig".to_string(),
            alg: "RS256".to_string(),
            n: encoder.encode_url_safe(&key.n().to_vec()),
            e: encoder.encode_url_safe(&key.e().to_vec()),
        }
    }

    /// Reconstruct the RSA public key described by `n` and `e`.
    ///
    /// Returns `None` when the parameters are not valid base64, when either is zero, or when the
    /// modulus is shorter than [`MIN_MODULUS_BITS`]; such a key cannot be used for verification.
    pub fn to_public_key<D: Base64Decoder>(&self, decoder: &D) -> Option<PKey<Public>> {
        let modulus = decode_unsigned(&self.n, decoder)
            .map_err(|e| log::debug!("Unable to decode modulus of JWK {}: {}", self.kid, e))
            .ok()?;
        let exponent = decode_unsigned(&self.e, decoder)
            .map_err(|e| log::debug!("Unable to decode exponent of JWK {}: {}", self.kid, e))
            .ok()?;

        if modulus.num_bits() < MIN_MODULUS_BITS || exponent.num_bits() == 0 {
            log::debug!(
                "JWK {} has an unusable modulus ({} bits) or exponent ({} bits)",
                self.kid,
                modulus.num_bits(),
                exponent.num_bits()
            );
            return None;
        }

        Rsa::from_public_components(modulus, exponent)
            .and_then(PKey::from_rsa)
            .map_err(|e| log::debug!("Unable to build an RSA key from JWK {}: {}", self.kid, e))
            .ok()
    }

    /// The reconstructed key as standard base64 of its X.509 SubjectPublicKeyInfo DER.
    pub fn to_public_key_string<C>(&self, codec: &C) -> Option<String>
    where
        C: Base64Encoder + Base64Decoder,
    {
        let key = self.to_public_key(codec)?;

        key.public_key_to_der()
            .map_err(|e| log::debug!("Unable to DER-encode JWK {}: {}", self.kid, e))
            .ok()
            .map(|der| codec.encode(&der))
    }
}

/// Decode a base64 value into a non-negative big integer.
fn decode_unsigned<D: Base64Decoder>(value: &str, decoder: &D) -> Result<BigNum, String> {
    let bytes = decoder.decode(value.as_bytes()).map_err(|e| e.to_string())?;

    // BN_bin2bn reads the bytes as an unsigned magnitude, so a set high bit stays positive
    BigNum::from_slice(&bytes).map_err(|e| e.to_string())
}

/// A provider's published key set, e.g. the body of a `jwks_uri` response.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}
