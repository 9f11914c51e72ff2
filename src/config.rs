use crate::auth::Algorithm;
use crate::error::{Error, Result};
use std::env;
use std::fmt;
use zeroize::Zeroizing;

/// The environment variable containing the token issuer, e.g. a developer team id.
pub const ISSUER_VAR: &'static str = "JWT_ISSUER";
/// The environment variable containing the id of the signing key.
pub const KEY_ID_VAR: &'static str = "JWT_KEY_ID";
/// The environment variable containing the base64 PKCS#8 private key, without PEM armor.
pub const PRIVATE_KEY_VAR: &'static str = "JWT_PRIVATE_KEY";
/// The environment variable selecting the signing algorithm, `ES256` when unset.
pub const ALGORITHM_VAR: &'static str = "JWT_ALGORITHM";

/// Everything needed to issue tokens with one signing key.
#[derive(Clone)]
pub struct IssuerConfig {
    issuer: String,
    key_id: String,
    private_key: Zeroizing<String>,
    algorithm: Algorithm,
}

impl IssuerConfig {
    /// Create an `ES256` configuration directly.
    pub fn new<I, K, S>(issuer: I, key_id: K, private_key: S) -> Self
    where
        I: Into<String>,
        K: Into<String>,
        S: Into<String>,
    {
        Self {
            issuer: issuer.into().trim().to_string(),
            key_id: key_id.into().trim().to_string(),
            private_key: Zeroizing::new(private_key.into()),
            algorithm: Algorithm::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Load the configuration from `JWT_ISSUER`, `JWT_KEY_ID`, `JWT_PRIVATE_KEY` and the optional
    /// `JWT_ALGORITHM` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load the configuration from an arbitrary variable source.
    ///
    /// Values are trimmed; required values must not be empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let issuer = required(&lookup, ISSUER_VAR)?.as_str().to_owned();
        let key_id = required(&lookup, KEY_ID_VAR)?.as_str().to_owned();
        let private_key = required(&lookup, PRIVATE_KEY_VAR)?;

        let algorithm = match lookup(ALGORITHM_VAR).map(|s| s.trim().to_string()) {
            Some(s) if !s.is_empty() => s
                .parse::<Algorithm>()
                .map_err(|e| Error::config(ALGORITHM_VAR, e.to_string()))?,
            _ => Algorithm::default(),
        };

        Ok(Self {
            issuer,
            key_id,
            private_key,
            algorithm,
        })
    }

    pub fn issuer(&self) -> &str {
        self.issuer.as_ref()
    }

    pub fn key_id(&self) -> &str {
        self.key_id.as_ref()
    }

    pub fn private_key(&self) -> &str {
        self.private_key.as_str()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .field("private_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Look up a required value and trim it. Both the raw and the trimmed value are wiped on drop.
fn required<F>(lookup: &F, var: &str) -> Result<Zeroizing<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = Zeroizing::new(lookup(var).unwrap_or_default());
    let value = raw.trim();

    if value.is_empty() {
        return Err(Error::config(
            var,
            format!("please set it using the {} environment variable", var),
        ));
    }

    Ok(Zeroizing::new(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{IssuerConfig, ALGORITHM_VAR, ISSUER_VAR, KEY_ID_VAR, PRIVATE_KEY_VAR};
    use crate::auth::Algorithm;
    use crate::error::Error;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = vars.iter().cloned().collect();
        move |name: &str| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_from_lookup_trims_values_and_defaults_algorithm() {
        let config = IssuerConfig::from_lookup(lookup_from(&[
            (ISSUER_VAR, "  TEAM  "),
            (KEY_ID_VAR, "KEYID\n"),
            (PRIVATE_KEY_VAR, " c2VjcmV0 "),
        ]))
        .unwrap();

        assert_eq!("TEAM", config.issuer());
        assert_eq!("KEYID", config.key_id());
        assert_eq!("c2VjcmV0", config.private_key());
        assert_eq!(Algorithm::Es256, config.algorithm());
    }

    #[test]
    fn test_from_lookup_parses_algorithm() {
        let config = IssuerConfig::from_lookup(lookup_from(&[
            (ISSUER_VAR, "TEAM"),
            (KEY_ID_VAR, "KEYID"),
            (PRIVATE_KEY_VAR, "c2VjcmV0"),
            (ALGORITHM_VAR, "RS256"),
        ]))
        .unwrap();

        assert_eq!(Algorithm::Rs256, config.algorithm());
    }

    #[test]
    fn test_from_lookup_rejects_unsupported_algorithm() {
        let result = IssuerConfig::from_lookup(lookup_from(&[
            (ISSUER_VAR, "TEAM"),
            (KEY_ID_VAR, "KEYID"),
            (PRIVATE_KEY_VAR, "c2VjcmV0"),
            (ALGORITHM_VAR, "HS256"),
        ]));

        match result {
            Err(Error::Config { var, reason }) => {
                assert_eq!(ALGORITHM_VAR, var);
                assert!(reason.contains("HS256"));
            }
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_requires_values() {
        let missing = IssuerConfig::from_lookup(lookup_from(&[
            (ISSUER_VAR, "TEAM"),
            (PRIVATE_KEY_VAR, "c2VjcmV0"),
        ]));
        assert!(matches!(missing, Err(Error::Config { var, .. }) if var == KEY_ID_VAR));

        let blank = IssuerConfig::from_lookup(lookup_from(&[
            (ISSUER_VAR, "   "),
            (KEY_ID_VAR, "KEYID"),
            (PRIVATE_KEY_VAR, "c2VjcmV0"),
        ]));
        assert!(matches!(blank, Err(Error::Config { var, .. }) if var == ISSUER_VAR));
    }

    #[test]
    fn test_from_lookup_keeps_line_breaks_inside_private_key() {
        let config = IssuerConfig::from_lookup(lookup_from(&[
            (ISSUER_VAR, "TEAM"),
            (KEY_ID_VAR, "KEYID"),
            (PRIVATE_KEY_VAR, "\n  c2Vj\ncmV0\r\n"),
        ]))
        .unwrap();

        assert_eq!("c2Vj\ncmV0", config.private_key());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = IssuerConfig::new("TEAM", "KEYID", "c2VjcmV0");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("c2VjcmV0"));
        assert!(debug.contains("<redacted>"));
    }
}
