//! Injected capabilities for JSON and base64.
//!
//! The codec never serializes anything itself. Callers hand it a JSON encoder/decoder for their
//! concrete header and payload types along with a base64 encoder/decoder, and the codec only
//! composes them. [`SerdeJson`] and [`StandardBase64`] are the implementations most callers want.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Turns a header and a payload into JSON strings.
pub trait JsonEncoder<H, P> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn header_to_json(&self, header: &H) -> Result<String, Self::Error>;

    fn payload_to_json(&self, payload: &P) -> Result<String, Self::Error>;
}

/// Materializes a header and a payload from JSON strings.
pub trait JsonDecoder<H, P> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn header_from(&self, json: &str) -> Result<H, Self::Error>;

    fn payload_from(&self, json: &str) -> Result<P, Self::Error>;
}

pub trait Base64Encoder {
    /// Encode with the URL-safe alphabet (`-`, `_`) and no padding.
    fn encode_url_safe(&self, bytes: &[u8]) -> String;

    /// Encode with the standard alphabet (`+`, `/`) and padding.
    fn encode(&self, bytes: &[u8]) -> String;
}

pub trait Base64Decoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// JSON capability backed by `serde_json` for any serde-compatible header and payload.
///
/// Field order follows the struct declaration order emitted by `#[derive(Serialize)]`, so the
/// output for a given value is stable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeJson;

impl<H, P> JsonEncoder<H, P> for SerdeJson
where
    H: Serialize,
    P: Serialize,
{
    type Error = serde_json::Error;

    fn header_to_json(&self, header: &H) -> Result<String, Self::Error> {
        serde_json::to_string(header)
    }

    fn payload_to_json(&self, payload: &P) -> Result<String, Self::Error> {
        serde_json::to_string(payload)
    }
}

impl<H, P> JsonDecoder<H, P> for SerdeJson
where
    H: DeserializeOwned,
    P: DeserializeOwned,
{
    type Error = serde_json::Error;

    fn header_from(&self, json: &str) -> Result<H, Self::Error> {
        serde_json::from_str(json)
    }

    fn payload_from(&self, json: &str) -> Result<P, Self::Error> {
        serde_json::from_str(json)
    }
}

/// Base64 capability backed by the `base64` crate.
///
/// Decoding accepts both the standard and the URL-safe alphabet, with or without trailing
/// padding. Anything else is rejected, including whitespace and `=` before the end of the input.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardBase64;

impl Base64Encoder for StandardBase64 {
    fn encode_url_safe(&self, bytes: &[u8]) -> String {
        base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
    }

    fn encode(&self, bytes: &[u8]) -> String {
        base64::encode_config(bytes, base64::STANDARD)
    }
}

impl Base64Decoder for StandardBase64 {
    type Error = base64::DecodeError;

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let unpadded = input
            .strip_suffix(b"==")
            .or_else(|| input.strip_suffix(b"="))
            .unwrap_or(input);

        // padding only ever completes the final quantum
        if unpadded.len() != input.len() && input.len() % 4 != 0 {
            return Err(base64::DecodeError::InvalidLength);
        }

        if let Some(offset) = unpadded.iter().position(|b| *b == b'=') {
            return Err(base64::DecodeError::InvalidByte(offset, b'='));
        }

        // fold the standard alphabet onto the url-safe one
        let normalized: Vec<u8> = unpadded
            .iter()
            .map(|b| match b {
                b'+' => b'-',
                b'/' => b'_',
                other => *other,
            })
            .collect();

        base64::decode_config(&normalized, base64::URL_SAFE_NO_PAD)
    }
}
