//! Image dimension probing.
//!
//! Reads the container header only; pixel data is never decoded. Corrupt or
//! unrecognized input is an error, and the worker treats it as a failed
//! extraction.

use image::ImageReader;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimensionError {
    #[error("Unrecognized image container: {0}")]
    Unrecognized(String),

    #[error("Failed to parse image header: {0}")]
    Parse(#[from] image::ImageError),
}

/// Extract pixel dimensions from an image container header.
pub fn extract_dimensions(data: &[u8]) -> Result<(u32, u32), DimensionError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| DimensionError::Unrecognized(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DimensionError::Unrecognized(
            "no known image signature".to_string(),
        ));
    }

    Ok(reader.into_dimensions()?)
}
