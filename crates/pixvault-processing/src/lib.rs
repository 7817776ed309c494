//! Pixvault Processing Library
//!
//! Pure extraction functions over raw image bytes: dimension probing and
//! EXIF probing. No I/O; callers run these under `spawn_blocking` because
//! container parsing is CPU-bound.

pub mod dimensions;
pub mod exif;

pub use dimensions::{extract_dimensions, DimensionError};
pub use exif::{dms_to_decimal, extract_exif};
