//! Compact serialization of tokens: `header.payload.signature`.


use crate::encoding::{Base64Decoder, Base64Encoder, JsonDecoder, JsonEncoder};
use crate::error::{Error, Result};
use crate::models::Token;

/// The character separating the segments of a compact token.
pub const TOKEN_DELIMITER: char = '.';

/// Build the exact byte sequence that gets signed: `b64url(json(header)) . b64url(json(payload))`.
///
/// Failures of the JSON capability are returned as [`Error::Json`] with the capability's error as
/// the source.
pub fn build_signing_input<H, P, J, E>(
    header: &H,
    payload: &P,
    json: &J,
    encoder: &E,
) -> Result<String>
where
    J: JsonEncoder<H, P>,
    E: Base64Encoder,
{
    let header_json = json.header_to_json(header).map_err(Error::json)?;
    let payload_json = json.payload_to_json(payload).map_err(Error::json)?;

    let header_b64 = encoder.encode_url_safe(header_json.as_bytes());
    let payload_b64 = encoder.encode_url_safe(payload_json.as_bytes());

    let mut value = String::with_capacity(header_b64.len() + 1 + payload_b64.len());
    value.push_str(&header_b64);
    value.push(TOKEN_DELIMITER);
    value.push_str(&payload_b64);

    Ok(value)
}

/// Append the encoded signature to a signing input, producing the final token.
///
/// Tokens issued by this crate pass [`Base64Encoder::encode_url_safe`] here; callers serving a
/// consumer that expects the standard alphabet in the last segment can pass
/// [`Base64Encoder::encode`] instead.
pub fn assemble_token<F>(signing_input: &str, signature: &[u8], encode: F) -> String
where
    F: FnOnce(&[u8]) -> String,
{
    format!("{}{}{}", signing_input, TOKEN_DELIMITER, encode(signature))
}

/// Decode a compact token into its header, payload and, when present, signature.
///
/// Returns `Ok(None)` if the string has fewer than two segments, i.e. it is not a JWT at all.
/// The signature is only decoded when there are exactly three segments. The signature is never
/// checked here; see [`crate::auth::verify`].
pub fn decode<H, P, J, D>(token: &str, json: &J, decoder: &D) -> Result<Option<Token<H, P>>>
where
    J: JsonDecoder<H, P>,
    D: Base64Decoder,
{
    let parts: Vec<&str> = token.split(TOKEN_DELIMITER).collect();

    if parts.len() < 2 {
        log::debug!("Refusing to decode a token with {} segment(s)", parts.len());
        return Ok(None);
    }

    let header_json = decode_segment(parts[0], decoder)?;
    let payload_json = decode_segment(parts[1], decoder)?;

    let header = json.header_from(&header_json).map_err(Error::json)?;
    let payload = json.payload_from(&payload_json).map_err(Error::json)?;

    let signature = if parts.len() == 3 {
        Some(decoder.decode(parts[2].as_bytes()).map_err(Error::base64)?)
    } else {
        None
    };

    Ok(Some(Token::new(header, payload, signature)))
}

fn decode_segment<D: Base64Decoder>(segment: &str, decoder: &D) -> Result<String> {
    let bytes = decoder.decode(segment.as_bytes()).map_err(Error::base64)?;

    Ok(String::from_utf8(bytes)?)
}

/// Split a token into exactly three raw segments, or `None` for any other shape.
pub(crate) fn split_signed(token: &str) -> Option<(&str, &str, &str)> {
    let mut parts = token.split(TOKEN_DELIMITER);

    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Some((header, payload, signature)),
        _ => None,
    }
}
