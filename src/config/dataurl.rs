// src/config/dataurl.rs

//! RFC 2397 `data:` URL decoding
//!
//! Ignition embeds file contents as `data:[<mediatype>][;base64],<data>`.
//! The media type is parsed only far enough to find the `;base64` flag.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

const SCHEME: &str = "data:";

/// Errors from decoding a data URL
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data URL (source must start with \"data:\")")]
    NotDataUrl,

    #[error("data URL has no ',' separating header and payload")]
    MissingComma,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Decode a data URL into its raw bytes
pub fn decode(url: &str) -> Result<Vec<u8>, DataUrlError> {
    let rest = url
        .get(..SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
        .map(|_| &url[SCHEME.len()..])
        .ok_or(DataUrlError::NotDataUrl)?;

    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

    let is_base64 = header
        .split(';')
        .skip(1)
        .any(|param| param.trim().eq_ignore_ascii_case("base64"));

    let unescaped = urlencoding::decode_binary(payload.as_bytes());

    if is_base64 {
        // Whitespace is tolerated inside base64 payloads
        let compact: Vec<u8> = unescaped
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        BASE64
            .decode(compact)
            .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))
    } else {
        Ok(unescaped.into_owned())
    }
}

/// Percent-encode bytes into a plain (non-base64) data URL
pub fn encode(data: &[u8]) -> String {
    format!("{SCHEME},{}", urlencoding::encode_binary(data))
}
