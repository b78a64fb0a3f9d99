//! Epoch-millisecond helpers shared by the store layer and providers.

use chrono::{TimeZone, Utc};

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format an epoch-millisecond timestamp as a short display date,
/// e.g. `"Sat Aug 29 2026"` (weekday, month, zero-padded day, year).
pub fn display_date(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(dt) => dt.format("%a %b %d %Y").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_date_formats_known_timestamp() {
        // 2026-08-29T00:00:00Z is a Saturday.
        assert_eq!(display_date(1_787_961_600_000), "Sat Aug 29 2026");
    }

    #[test]
    fn test_display_date_zero_pads_day() {
        // 2026-08-01T00:00:00Z is a Saturday.
        assert_eq!(display_date(1_785_542_400_000), "Sat Aug 01 2026");
    }

    #[test]
    fn test_display_date_out_of_range_is_empty() {
        assert_eq!(display_date(i64::MAX), "");
    }

    #[test]
    fn test_now_ms_is_recent() {
        // Past 2020-01-01 in ms.
        assert!(now_ms() > 1_577_836_800_000);
    }
}
