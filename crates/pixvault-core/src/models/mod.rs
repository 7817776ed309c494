pub mod image;
pub mod job;

pub use image::{ExifData, GeoPoint, ImageRecord, ImageStatus};
pub use job::ExtractionJob;
