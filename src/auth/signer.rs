use crate::encoding::Base64Decoder;
use crate::error::{Error, Result};
use openssl::bn::BigNum;
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{Id, PKey, PKeyRef, Private};
use openssl::sign::Signer;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Byte length of each of `r` and `s` in an ES256 signature.
pub(crate) const ES256_COMPONENT_LEN: usize = 32;

/// The signing algorithms supported for token issuance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// ECDSA on curve P-256 with SHA-256.
    Es256,
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    Rs256,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Es256 => "ES256",
            Self::Rs256 => "RS256",
        }
    }

    pub(crate) fn digest(&self) -> MessageDigest {
        MessageDigest::sha256()
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Es256
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ES256" => Ok(Self::Es256),
            "RS256" => Ok(Self::Rs256),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign `signing_input` with the named algorithm.
///
/// `private_key` is the base64 encoding of a PKCS#8 DER private key, without PEM armor: an EC
/// key on P-256 for `ES256` or an RSA key for `RS256`. ES256 signatures are returned in the JOSE
/// layout, `r || s`, each left-padded to 32 bytes.
///
/// # Errors
///
/// * [`Error::UnsupportedAlgorithm`] for any algorithm other than `ES256` and `RS256`.
/// * [`Error::InvalidKey`] if the key does not decode, does not parse, or does not fit the
///   algorithm.
pub fn sign<D: Base64Decoder>(
    algorithm: &str,
    private_key: &str,
    signing_input: &str,
    decoder: &D,
) -> Result<Vec<u8>> {
    let algorithm = algorithm.parse::<Algorithm>()?;
    let key = load_private_key(algorithm, private_key, decoder)?;

    sign_with_key(algorithm, &key, signing_input.as_bytes())
}

/// Decode and parse a PKCS#8 private key, checking it is usable with `algorithm`.
///
/// Whitespace in the key text is dropped first, so the line-wrapped body of a `.p8` file works.
pub(crate) fn load_private_key<D: Base64Decoder>(
    algorithm: Algorithm,
    private_key: &str,
    decoder: &D,
) -> Result<PKey<Private>> {
    let compact = Zeroizing::new(private_key.split_ascii_whitespace().collect::<String>());

    let der = Zeroizing::new(
        decoder
            .decode(compact.as_bytes())
            .map_err(|e| Error::InvalidKey(format!("private key is not valid base64: {}", e)))?,
    );

    let key = PKey::private_key_from_pkcs8(&der)
        .map_err(|e| Error::InvalidKey(format!("unable to parse PKCS#8 private key: {}", e)))?;

    match algorithm {
        Algorithm::Es256 => {
            let curve = key
                .ec_key()
                .map_err(|_| Error::InvalidKey("ES256 requires an EC private key".into()))?
                .group()
                .curve_name();

            if curve != Some(Nid::X9_62_PRIME256V1) {
                return Err(Error::InvalidKey(
                    "ES256 requires a private key on curve P-256".into(),
                ));
            }
        }
        Algorithm::Rs256 => {
            if key.id() != Id::RSA {
                return Err(Error::InvalidKey(
                    "RS256 requires an RSA private key".into(),
                ));
            }
        }
    }

    Ok(key)
}

pub(crate) fn sign_with_key(
    algorithm: Algorithm,
    key: &PKeyRef<Private>,
    data: &[u8],
) -> Result<Vec<u8>> {
    let mut signer = Signer::new(algorithm.digest(), key)?;
    signer.update(data)?;
    let signature = signer.sign_to_vec()?;

    match algorithm {
        // openssl emits a DER-encoded ECDSA-Sig-Value
        Algorithm::Es256 => der_to_jose(&signature),
        Algorithm::Rs256 => Ok(signature),
    }
}

fn der_to_jose(der: &[u8]) -> Result<Vec<u8>> {
    let signature = EcdsaSig::from_der(der)?;

    let mut result = Vec::with_capacity(ES256_COMPONENT_LEN * 2);
    result.extend(left_pad(&signature.r().to_vec(), ES256_COMPONENT_LEN));
    result.extend(left_pad(&signature.s().to_vec(), ES256_COMPONENT_LEN));

    Ok(result)
}

/// Convert a JOSE `r || s` signature back into DER, or `None` if it has the wrong shape.
pub(crate) fn jose_to_der(signature: &[u8]) -> Option<Vec<u8>> {
    if signature.len() != ES256_COMPONENT_LEN * 2 {
        return None;
    }

    let (r, s) = signature.split_at(ES256_COMPONENT_LEN);

    BigNum::from_slice(r)
        .and_then(|r| Ok((r, BigNum::from_slice(s)?)))
        .and_then(|(r, s)| EcdsaSig::from_private_components(r, s))
        .and_then(|sig| sig.to_der())
        .ok()
}

fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut result = vec![0; len.saturating_sub(bytes.len())];
    result.extend_from_slice(bytes);
    result
}
