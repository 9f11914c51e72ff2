use crate::encoding::Base64Decoder;
use crate::models::JwkSet;
use jwt::{PKeyWithDigest, Store};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Public};
use std::collections::HashMap;

/// Verification keys indexed by key id, built from a provider's published JWK set.
#[derive(Default)]
pub struct JwkKeyring {
    keys: HashMap<String, PKeyWithDigest<Public>>,
}

impl JwkKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert every usable key in `set`. Keys that cannot be reconstructed are skipped.
    pub fn from_jwk_set<D: Base64Decoder>(set: &JwkSet, decoder: &D) -> Self {
        let mut result = Self {
            keys: HashMap::with_capacity(set.keys.len()),
        };

        for jwk in set.keys.iter() {
            match jwk.to_public_key(decoder) {
                Some(key) => result.insert(jwk.kid.as_str(), key),
                None => log::warn!("Skipping unusable key {} in JWK set.", jwk.kid),
            }
        }

        result
    }

    /// Add a SHA-256 verification key, replacing any key with the same id.
    pub fn insert<S: Into<String>>(&mut self, key_id: S, key: PKey<Public>) {
        self.keys.insert(
            key_id.into(),
            PKeyWithDigest {
                digest: MessageDigest::sha256(),
                key,
            },
        );
    }

    pub fn contains(&self, key_id: &str) -> bool {
        self.keys.contains_key(key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Store for JwkKeyring {
    type Algorithm = PKeyWithDigest<Public>;

    fn get(&self, key_id: &str) -> Option<&Self::Algorithm> {
        self.keys.get(key_id)
    }
}
