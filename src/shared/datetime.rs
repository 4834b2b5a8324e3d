use chrono::{DateTime, FixedOffset, Utc};

/// IST is a fixed UTC+5:30 offset; the wire format is pinned to it
/// regardless of the caller's timezone.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("valid IST offset")
}

/// Format a UTC instant as `DD-MM-YYYY HH:MM:SS AM/PM` in IST.
pub fn format_ist(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&ist_offset())
        .format("%d-%m-%Y %I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_ist_offset_and_meridiem() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        // 10:00 UTC is 15:30 IST
        assert_eq!(format_ist(instant), "15-01-2024 03:30:00 PM");
    }

    #[test]
    fn crosses_date_boundary_eastward() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 31, 20, 45, 0).unwrap();
        // 20:45 UTC is 02:15 IST the next day
        assert_eq!(format_ist(instant), "01-04-2024 02:15:00 AM");
    }

    #[test]
    fn morning_hours_use_am() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 1, 0, 30).unwrap();
        assert_eq!(format_ist(instant), "01-06-2024 06:30:30 AM");
    }
}
