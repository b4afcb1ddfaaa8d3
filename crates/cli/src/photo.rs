use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rental_furnish_core::models::recommendation::PhotoDataUri;

use crate::errors::{CliError, Result};

/// Read an image from disk and wrap it as a base64 data URI.
pub fn load_photo(path: &Path) -> Result<PhotoDataUri> {
    let mime_type = mime_for(path)?;
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(CliError::Usage(format!("{} is empty", path.display())));
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), mime_type, "loaded photo");
    Ok(PhotoDataUri::new(mime_type, STANDARD.encode(bytes))?)
}

fn mime_for(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "heic" => Ok("image/heic"),
        _ => Err(CliError::Usage(format!(
            "{} is not a supported photo (use .jpg, .png, .webp, .gif or .heic)",
            path.display()
        ))),
    }
}
