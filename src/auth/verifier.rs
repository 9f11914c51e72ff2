use super::signer::{jose_to_der, Algorithm};
use crate::codec::{split_signed, TOKEN_DELIMITER};
use crate::encoding::Base64Decoder;
use crate::models::Jwk;
use jwt::PKeyWithDigest;
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::pkey::{Id, PKey, Public};
use openssl::sign::Verifier;

/// Reconstruct the RSA public key described by a JWK, or `None` if it cannot be used.
pub fn jwk_to_public_key<D: Base64Decoder>(jwk: &Jwk, decoder: &D) -> Option<PKey<Public>> {
    jwk.to_public_key(decoder)
}

/// Verify an `RS256` token against an RSA JWK.
///
/// Every failure collapses to `false`: an unusable JWK, a token without exactly three segments,
/// an undecodable signature, or a signature that does not match.
pub fn verify<D: Base64Decoder>(token: &str, jwk: &Jwk, decoder: &D) -> bool {
    verify_with_algorithm(token, jwk, decoder, Algorithm::Rs256.name())
}

/// Like [`verify`], naming the algorithm explicitly. JWKs carry RSA keys, so anything other than
/// `RS256` is refused.
pub fn verify_with_algorithm<D: Base64Decoder>(
    token: &str,
    jwk: &Jwk,
    decoder: &D,
    algorithm: &str,
) -> bool {
    if algorithm != Algorithm::Rs256.name() {
        log::debug!("Refusing to verify with RSA key {} using {}", jwk.kid, algorithm);
        return false;
    }

    let key = match jwk_to_public_key(jwk, decoder) {
        Some(key) => key,
        None => return false,
    };

    verify_with_key(
        token,
        &PKeyWithDigest {
            digest: MessageDigest::sha256(),
            key,
        },
        decoder,
    )
}

/// Verify a token against an already-built public key.
///
/// RSA keys are checked with PKCS#1 v1.5; EC keys expect the JOSE `r || s` signature layout.
/// The signing input is the raw text of the first two segments exactly as it appears in the
/// token, never a re-serialization of the decoded JSON.
pub fn verify_with_key<D: Base64Decoder>(
    token: &str,
    key: &PKeyWithDigest<Public>,
    decoder: &D,
) -> bool {
    let (header, payload, signature) = match split_signed(token) {
        Some(parts) => parts,
        None => {
            log::debug!("Token does not have exactly three segments");
            return false;
        }
    };

    let signature = match decoder.decode(signature.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Unable to decode token signature: {}", e);
            return false;
        }
    };

    match check_signature(key, header, payload, &signature) {
        Ok(verified) => verified,
        Err(e) => {
            log::debug!("Signature check failed: {}", e);
            false
        }
    }
}

fn check_signature(
    key: &PKeyWithDigest<Public>,
    header: &str,
    payload: &str,
    signature: &[u8],
) -> Result<bool, ErrorStack> {
    let mut verifier = Verifier::new(key.digest, &key.key)?;
    verifier.update(header.as_bytes())?;
    verifier.update(&[TOKEN_DELIMITER as u8])?;
    verifier.update(payload.as_bytes())?;

    if key.key.id() == Id::EC {
        match jose_to_der(signature) {
            Some(der) => verifier.verify(&der),
            None => Ok(false),
        }
    } else {
        verifier.verify(signature)
    }
}
