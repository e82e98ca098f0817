//! Image payload encoding.

use base64::{engine::general_purpose, Engine as _};
use std::path::Path;

/// Encodes image bytes as a `data:` URL, guessing the MIME type from `path`.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn image_data_url(bytes: &[u8], path: impl AsRef<Path>) -> String {
    let mime = mime_guess::from_path(path.as_ref()).first_or_octet_stream();
    format!(
        "data:{};base64,{}",
        mime.essence_str(),
        general_purpose::STANDARD.encode(bytes)
    )
}
