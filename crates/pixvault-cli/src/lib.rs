/// Guess a content type from a file extension. Only the supported image
/// formats are mapped; anything else must be passed explicitly.
pub fn guess_content_type(path: &std::path::Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn guess_known_extensions() {
        assert_eq!(guess_content_type(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("a.JPEG")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("dir/b.png")), Some("image/png"));
        assert_eq!(guess_content_type(Path::new("c.webp")), Some("image/webp"));
        assert_eq!(guess_content_type(Path::new("d.gif")), Some("image/gif"));
    }

    #[test]
    fn guess_unknown_or_missing_extension() {
        assert_eq!(guess_content_type(Path::new("a.pdf")), None);
        assert_eq!(guess_content_type(Path::new("noext")), None);
    }
}
