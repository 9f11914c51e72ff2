use super::{Header, Jwk, JwkSet, NoClaims, Payload};
use crate::encoding::{Base64Encoder, StandardBase64};
use openssl::rsa::Rsa;
use serde::{Deserialize, Serialize};

const JWKS_EXAMPLE: &'static str = r#"{
  "keys": [
    {
      "kty": "RSA",
      "kid": "first",
      "use": "sig",
      "alg": "RS256",
      "n": "AQAB",
      "e": "AQAB"
    },
    {
      "kty": "RSA",
      "kid": "second",
      "use": "sig",
      "alg": "RS256",
      "n": "",
      "e": ""
    }
  ]
}"#;

fn jwk_with(n: &str, e: &str) -> Jwk {
    Jwk {
        kty: "RSA".into(),
        kid: "KEYID".into(),
        key_use: "sig".into(),
        alg: "RS256".into(),
        n: n.into(),
        e: e.into(),
    }
}

#[test]
fn test_header_defaults_to_es256() {
    assert_eq!("ES256", Header::new("KEYID").alg);

    let header: Header = serde_json::from_str(r#"{"kid":"KEYID"}"#).unwrap();
    assert_eq!(Header::new("KEYID"), header);
}

#[test]
fn test_header_json_shape() {
    let json = serde_json::to_string(&Header::new("ABC123DEFG")).unwrap();

    assert_eq!(r#"{"alg":"ES256","kid":"ABC123DEFG"}"#, json);
}

#[test]
fn test_payload_without_claims_has_only_base_fields() {
    let json = serde_json::to_string(&Payload::issued_at("TEAM", 42)).unwrap();

    assert_eq!(r#"{"iss":"TEAM","iat":42}"#, json);
}

#[test]
fn test_payload_captures_current_time() {
    let before = super::now();
    let payload = Payload::new("TEAM");
    let after = super::now();

    assert!(payload.iat >= before && payload.iat <= after);
    assert_eq!(NoClaims::default(), payload.claims);
}

#[test]
fn test_payload_extension_claims_round_trip() {
    #[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
    struct Expiring {
        sub: String,
        exp: i64,
    }

    let payload = Payload::with_claims(
        "TEAM",
        100,
        Expiring {
            sub: "user".into(),
            exp: 3700,
        },
    );

    let json = serde_json::to_string(&payload).unwrap();
    assert_eq!(r#"{"iss":"TEAM","iat":100,"sub":"user","exp":3700}"#, json);

    let parsed: Payload<Expiring> = serde_json::from_str(&json).unwrap();
    assert_eq!(payload, parsed);
}

#[test]
fn test_jwk_json_uses_wire_names() {
    let jwk = jwk_with("AQAB", "AQAB");
    let value = serde_json::to_value(&jwk).unwrap();

    assert_eq!("sig", value["use"]);
    assert!(value.get("key_use").is_none());
}

#[test]
fn test_jwk_set_find() {
    let set: JwkSet = serde_json::from_str(JWKS_EXAMPLE).unwrap();

    assert_eq!(2, set.keys.len());
    assert_eq!("second", set.find("second").unwrap().kid);
    assert!(set.find("third").is_none());
}

#[test]
fn test_jwk_reconstructs_rsa_key() {
    let rsa = Rsa::generate(2048).unwrap();
    let jwk = Jwk::from_rsa("KEYID", &rsa, &StandardBase64);

    let key = jwk.to_public_key(&StandardBase64).unwrap();
    let rebuilt = key.rsa().unwrap();

    assert_eq!(rsa.n().to_vec(), rebuilt.n().to_vec());
    assert_eq!(rsa.e().to_vec(), rebuilt.e().to_vec());
    assert_eq!("AQAB", jwk.e);
}

#[test]
fn test_jwk_modulus_with_high_bit_set_stays_positive() {
    // a 2048-bit modulus always has its top bit set, there is no leading zero byte on the wire
    let rsa = Rsa::generate(2048).unwrap();
    let jwk = Jwk::from_rsa("KEYID", &rsa, &StandardBase64);
    let n_bytes = rsa.n().to_vec();
    assert!(n_bytes[0] & 0x80 != 0);

    let key = jwk.to_public_key(&StandardBase64).unwrap();

    assert!(!key.rsa().unwrap().n().is_negative());
    assert_eq!(2048, key.bits());
}

#[test]
fn test_jwk_with_empty_parameters_is_unusable() {
    assert!(jwk_with("", "").to_public_key(&StandardBase64).is_none());
    assert!(jwk_with("", "AQAB").to_public_key(&StandardBase64).is_none());
}

#[test]
fn test_jwk_with_malformed_base64_is_unusable() {
    assert!(jwk_with("not*base64", "AQAB")
        .to_public_key(&StandardBase64)
        .is_none());
}

#[test]
fn test_jwk_with_short_modulus_is_unusable() {
    let short = StandardBase64.encode_url_safe(&[0xc5; 32]);

    assert!(jwk_with(&short, "AQAB").to_public_key(&StandardBase64).is_none());
}

#[test]
fn test_jwk_with_zero_exponent_is_unusable() {
    let rsa = Rsa::generate(1024).unwrap();
    let mut jwk = Jwk::from_rsa("KEYID", &rsa, &StandardBase64);
    jwk.e = StandardBase64.encode_url_safe(&[0, 0]);

    assert!(jwk.to_public_key(&StandardBase64).is_none());
}

#[test]
fn test_jwk_public_key_string_is_spki_der() {
    let rsa = Rsa::generate(2048).unwrap();
    let jwk = Jwk::from_rsa("KEYID", &rsa, &StandardBase64);

    let expected = StandardBase64.encode(&rsa.public_key_to_der().unwrap());

    assert_eq!(Some(expected), jwk.to_public_key_string(&StandardBase64));
    assert!(jwk_with("", "").to_public_key_string(&StandardBase64).is_none());
}
