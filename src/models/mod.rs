mod jwk;
mod jwt;

#[cfg(test)]
mod tests;

pub use self::jwk::{Jwk, JwkSet, MIN_MODULUS_BITS};
pub use self::jwt::{now, Header, JoseHeader, NoClaims, Payload, Token, DEFAULT_ALGORITHM};
