//! EXIF metadata probing.
//!
//! Extracts capture time, GPS position, and camera model. EXIF is only
//! meaningful for containers that carry it (JPEG, TIFF, some PNG/WebP);
//! absent, corrupt, or wrong-container input yields `None` rather than an
//! error, and individual fields are independently optional.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use pixvault_core::models::{ExifData, GeoPoint};
use std::io::Cursor;

/// Probe image bytes for EXIF metadata.
///
/// Returns `None` when the container carries no readable EXIF block, or when
/// the block yields no field of interest.
pub fn extract_exif(data: &[u8]) -> Option<ExifData> {
    let mut reader = exif::Reader::new();
    reader.continue_on_error(true);
    let mut cursor = Cursor::new(data);

    let parsed = reader
        .read_from_container(&mut cursor)
        .or_else(|e| e.distill_partial_result(|_| {}))
        .ok()?;

    let exif = ExifData {
        created: extract_datetime(&parsed),
        location: extract_gps(&parsed),
        camera: extract_camera(&parsed),
    };

    if exif.is_empty() {
        None
    } else {
        Some(exif)
    }
}

/// Convert a GPS degrees/minutes/seconds triplet to decimal degrees.
///
/// Negated for southern and western hemispheres.
pub fn dms_to_decimal(dms: [f64; 3], reference: &str) -> f64 {
    let decimal = dms[0] + dms[1] / 60.0 + dms[2] / 3600.0;
    match reference {
        "S" | "W" => -decimal,
        _ => decimal,
    }
}

/// Capture time, trying tags in priority order. EXIF datetimes carry no zone;
/// they are taken as UTC.
fn extract_datetime(parsed: &exif::Exif) -> Option<DateTime<Utc>> {
    let tags = [
        exif::Tag::DateTimeOriginal,
        exif::Tag::DateTimeDigitized,
        exif::Tag::DateTime,
    ];

    for tag in tags {
        if let Some(field) = parsed.get_field(tag, exif::In::PRIMARY) {
            if let Some(dt) = parse_exif_datetime(&field.display_value().to_string()) {
                return Some(dt);
            }
        }
    }
    None
}

/// Parse the EXIF datetime format `YYYY:MM:DD HH:MM:SS`.
fn parse_exif_datetime(s: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

fn extract_gps(parsed: &exif::Exif) -> Option<GeoPoint> {
    let lat = extract_gps_coordinate(parsed, exif::Tag::GPSLatitude, exif::Tag::GPSLatitudeRef)?;
    let lon = extract_gps_coordinate(parsed, exif::Tag::GPSLongitude, exif::Tag::GPSLongitudeRef)?;
    Some(GeoPoint { lat, lon })
}

fn extract_gps_coordinate(
    parsed: &exif::Exif,
    coord_tag: exif::Tag,
    ref_tag: exif::Tag,
) -> Option<f64> {
    let coord_field = parsed.get_field(coord_tag, exif::In::PRIMARY)?;
    let ref_field = parsed.get_field(ref_tag, exif::In::PRIMARY)?;

    // GPS coordinates are stored as [degrees, minutes, seconds] rationals.
    let rationals = match &coord_field.value {
        exif::Value::Rational(r) if r.len() >= 3 => r,
        _ => return None,
    };

    let dms = [
        rationals[0].to_f64(),
        rationals[1].to_f64(),
        rationals[2].to_f64(),
    ];

    let reference = ref_field.display_value().to_string();
    Some(dms_to_decimal(dms, reference.trim()))
}

fn extract_camera(parsed: &exif::Exif) -> Option<String> {
    let field = parsed.get_field(exif::Tag::Model, exif::In::PRIMARY)?;
    let model = match &field.value {
        exif::Value::Ascii(chunks) if !chunks.is_empty() => {
            String::from_utf8_lossy(&chunks[0]).trim_matches(char::from(0)).trim().to_string()
        }
        _ => return None,
    };
    if model.is_empty() {
        None
    } else {
        Some(model)
    }
}
