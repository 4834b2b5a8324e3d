use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Strict `"<number>, <number>"` pattern for free-text coordinate pairs.
    /// Anything looser (embedded in a sentence, missing comma, non-numeric
    /// parts) is treated as a plain location description.
    /// - Valid: "12.9716, 77.5946", "-33.86,151.21", " 10 , 20 "
    /// - Invalid: "near 12.9, 77.5 junction", "12.9716", "lat,lng"
    pub static ref COORDINATE_PAIR_REGEX: Regex =
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").unwrap();
}

/// Parse a strict coordinate pair out of free text, if it is one.
pub fn parse_coordinate_pair(input: &str) -> Option<(f64, f64)> {
    let caps = COORDINATE_PAIR_REGEX.captures(input)?;
    let latitude = caps.get(1)?.as_str().parse().ok()?;
    let longitude = caps.get(2)?.as_str().parse().ok()?;
    Some((latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_pairs() {
        assert_eq!(
            parse_coordinate_pair("12.9716, 77.5946"),
            Some((12.9716, 77.5946))
        );
        assert_eq!(
            parse_coordinate_pair("-33.86,151.21"),
            Some((-33.86, 151.21))
        );
        assert_eq!(parse_coordinate_pair(" 10 , 20 "), Some((10.0, 20.0)));
    }

    #[test]
    fn rejects_free_text() {
        assert_eq!(parse_coordinate_pair("MG Road, Bengaluru"), None);
        assert_eq!(parse_coordinate_pair("near 12.9, 77.5 junction"), None);
        assert_eq!(parse_coordinate_pair("12.9716"), None);
        assert_eq!(parse_coordinate_pair(""), None);
    }
}
