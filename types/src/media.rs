//! Media-type helpers for uploaded files.

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const APPLICATION_PDF: &str = "application/pdf";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lowercase a declared media type and drop any parameters
/// (`"Image/PNG; charset=x"` becomes `"image/png"`).
pub fn normalize(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether the media type names any image subtype.
pub fn is_image(media_type: &str) -> bool {
    normalize(media_type)
        .strip_prefix("image/")
        .is_some_and(|sub| !sub.is_empty())
}

/// Guess a media type from a file extension.
pub fn from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => IMAGE_JPEG,
        "png" => IMAGE_PNG,
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "pdf" => APPLICATION_PDF,
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_parameters() {
        assert_eq!(normalize(" Image/PNG; q=0.9"), "image/png");
    }

    #[test]
    fn image_detection() {
        assert!(is_image("image/webp"));
        assert!(is_image("IMAGE/JPEG"));
        assert!(!is_image("image/"));
        assert!(!is_image("application/pdf"));
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(from_extension("JPG"), IMAGE_JPEG);
        assert_eq!(from_extension("exe"), OCTET_STREAM);
    }
}
