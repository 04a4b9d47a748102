use crate::error::{Error, Result};
use std::path::Path;

/// Determine the content type of a file based on its extension
pub fn determine_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("tiff") => "image/tiff",
        Some("bmp") => "image/bmp",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("m4v") => "video/x-m4v",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("aac") => "audio/aac",
        Some("wma") => "audio/x-ms-wma",
        _ => "application/octet-stream",
    }
}

/// Check whether a path exists on disk
pub fn file_exists(path: &str) -> bool {
    !path.is_empty() && Path::new(path).exists()
}

/// Validate an URL to fetch media from
pub fn is_valid_url(url: &str) -> Result<()> {
    // Try to parse the URL
    let parsed_url = match url::Url::parse(url) {
        Ok(url) => url,
        Err(_) => return Err(Error::InvalidRequest("Invalid URL: ".to_string() + url)),
    };

    // Check scheme - must be http or https
    match parsed_url.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(Error::InvalidRequest(
                "URL must use http or https scheme".to_string(),
            ))
        }
    }

    // Check if host exists
    match parsed_url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(Error::InvalidRequest(
            "URL must have a valid host".to_string(),
        )),
    }
}

/// File name to report for content fetched from a URL
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}
