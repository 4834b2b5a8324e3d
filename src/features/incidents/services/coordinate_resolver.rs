use std::io::Cursor;

use crate::shared::validation::parse_coordinate_pair;

/// Both members inside the WGS84 envelope
pub fn is_valid_pair(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Pick the coordinate pair for an incident. Photo metadata wins over the
/// explicit form fields, which win over a "lat,lng" shaped location string.
/// `None` is a valid terminal state, not an error.
pub fn resolve(
    exif_gps: Option<(f64, f64)>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    raw_location: &str,
) -> Option<(f64, f64)> {
    if let Some((lat, lng)) = exif_gps {
        if is_valid_pair(lat, lng) {
            return Some((lat, lng));
        }
    }

    if let (Some(lat), Some(lng)) = (latitude, longitude) {
        if is_valid_pair(lat, lng) {
            return Some((lat, lng));
        }
    }

    parse_coordinate_pair(raw_location).filter(|(lat, lng)| is_valid_pair(*lat, *lng))
}

fn dms_to_decimal(value: &exif::Value) -> Option<f64> {
    match value {
        exif::Value::Rational(parts) => {
            let degrees = parts.first()?.to_f64();
            let minutes = parts.get(1).map(|r| r.to_f64()).unwrap_or(0.0);
            let seconds = parts.get(2).map(|r| r.to_f64()).unwrap_or(0.0);
            Some(degrees + minutes / 60.0 + seconds / 3600.0)
        }
        _ => None,
    }
}

fn hemisphere_sign(data: &exif::Exif, tag: exif::Tag) -> f64 {
    let negative = data
        .get_field(tag, exif::In::PRIMARY)
        .and_then(|field| match &field.value {
            exif::Value::Ascii(parts) => parts.first().and_then(|s| s.first()).copied(),
            _ => None,
        })
        .map(|c| c == b'S' || c == b'W')
        .unwrap_or(false);
    if negative {
        -1.0
    } else {
        1.0
    }
}

/// Extract a GPS fix from image metadata, if the photo carries one
pub fn extract_gps(image_bytes: &[u8]) -> Option<(f64, f64)> {
    let data = exif::Reader::new()
        .read_from_container(&mut Cursor::new(image_bytes))
        .ok()?;

    let latitude = data
        .get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY)
        .and_then(|f| dms_to_decimal(&f.value))?;
    let longitude = data
        .get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY)
        .and_then(|f| dms_to_decimal(&f.value))?;

    let lat = latitude * hemisphere_sign(&data, exif::Tag::GPSLatitudeRef);
    let lng = longitude * hemisphere_sign(&data, exif::Tag::GPSLongitudeRef);

    if is_valid_pair(lat, lng) {
        Some((lat, lng))
    } else {
        None
    }
}
