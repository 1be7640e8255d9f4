//! Reversible, cookie-safe compression for oversized values.
//!
//! Deflate then base64 (URL-safe, unpadded, so the output survives cookie
//! value syntax), tagged with a marker prefix so already-compressed values
//! are never re-encoded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use thiserror::Error;

/// Prefix marking a value as compressed by this codec.
pub const COMPRESSED_MARKER: &str = "zv1:";

#[derive(Debug, Error)]
pub enum CookieCodecError {
    #[error("value does not carry the compressed marker")]
    MissingMarker,

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("deflate failed: {0}")]
    Deflate(#[from] std::io::Error),

    #[error("decompressed value is not UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Compress a value into its marked, cookie-safe form.
pub fn encode_value(value: &str) -> Result<String, CookieCodecError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(value.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(format!(
        "{}{}",
        COMPRESSED_MARKER,
        URL_SAFE_NO_PAD.encode(compressed)
    ))
}

/// Inverse of [`encode_value`]. Byte-exact round trip.
pub fn decode_value(encoded: &str) -> Result<String, CookieCodecError> {
    let payload = encoded
        .strip_prefix(COMPRESSED_MARKER)
        .ok_or(CookieCodecError::MissingMarker)?;
    let compressed = URL_SAFE_NO_PAD.decode(payload)?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(String::from_utf8(out)?)
}
