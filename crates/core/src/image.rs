//! Stored image payloads and their text form.
//!
//! Logos, portraits and circuit images are kept as raw bytes in the
//! database. Anything that leaves a controller carries them as standard
//! base64 text instead; an absent (or empty) image is always `None`,
//! never an error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Encode stored image bytes for transport.
pub fn encode(bytes: Option<&[u8]>) -> Option<String> {
    match bytes {
        Some(b) if !b.is_empty() => Some(STANDARD.encode(b)),
        _ => None,
    }
}

/// Reverse [`encode`].
pub fn decode(text: &str) -> Result<Vec<u8>, CoreError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CoreError::invalid("image", format!("invalid base64: {e}")))
}

/// Identify the image format of an uploaded payload from its magic bytes.
///
/// Returns the MIME type (e.g. `image/png`). Payloads that are not a
/// recognisable image are rejected as a validation error on `field`.
pub fn sniff(field: &str, bytes: &[u8]) -> Result<&'static str, CoreError> {
    let format = ::image::guess_format(bytes)
        .map_err(|_| CoreError::invalid(field, "must be a PNG, JPEG, WebP or GIF image"))?;
    Ok(format.to_mime_type())
}

/// Normalise an optional upload: empty parts count as "no image", anything
/// else must sniff as an image.
pub fn accept_upload(field: &str, bytes: Option<Vec<u8>>) -> Result<Option<Vec<u8>>, CoreError> {
    match bytes {
        Some(b) if !b.is_empty() => {
            sniff(field, &b)?;
            Ok(Some(b))
        }
        _ => Ok(None),
    }
}
