// ---------------------------------------------------------------------------
// Linear time key
// ---------------------------------------------------------------------------

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;
/// Every month counts as 30 days.
pub const MINUTES_PER_MONTH: i64 = 30 * MINUTES_PER_DAY;
/// Every year counts as 365 days.
pub const MINUTES_PER_YEAR: i64 = 365 * MINUTES_PER_DAY;

/// Encode a calendar date and 24-hour clock time into a single comparable key.
///
/// The key is a minute count under a fixed 30-day month / 365-day year
/// calendar. Ordering is exact within a month; across month or year
/// boundaries it is only as accurate as that approximation, which existing
/// logs and exports depend on.
pub fn encode(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    i64::from(minute)
        + i64::from(hour) * MINUTES_PER_HOUR
        + i64::from(day) * MINUTES_PER_DAY
        + i64::from(month) * MINUTES_PER_MONTH
        + i64::from(year) * MINUTES_PER_YEAR
}

// ---------------------------------------------------------------------------
// 12-hour clock
// ---------------------------------------------------------------------------

/// AM / PM marker of a 12-hour clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Recognise a marker by its first character (`A` or `P`, any case).
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.chars().next()?.to_ascii_uppercase() {
            'A' => Some(Meridiem::Am),
            'P' => Some(Meridiem::Pm),
            _ => None,
        }
    }
}

/// Convert a 12-hour clock hour to 24-hour form.
///
/// `12 AM` is midnight (0) and `12 PM` is noon (12).
pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> u32 {
    match (meridiem, hour) {
        (Meridiem::Pm, 12) => hour,
        (Meridiem::Pm, _) => hour + 12,
        (Meridiem::Am, 12) => hour - 12,
        (Meridiem::Am, _) => hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_24_hour_branches() {
        assert_eq!(to_24_hour(3, Meridiem::Pm), 15);
        assert_eq!(to_24_hour(12, Meridiem::Pm), 12);
        assert_eq!(to_24_hour(3, Meridiem::Am), 3);
        assert_eq!(to_24_hour(12, Meridiem::Am), 0);
    }

    #[test]
    fn test_meridiem_marker() {
        assert_eq!(Meridiem::from_marker("AM"), Some(Meridiem::Am));
        assert_eq!(Meridiem::from_marker("PM"), Some(Meridiem::Pm));
        assert_eq!(Meridiem::from_marker("p"), Some(Meridiem::Pm));
        assert_eq!(Meridiem::from_marker("XM"), None);
        assert_eq!(Meridiem::from_marker(""), None);
    }

    #[test]
    fn test_encode_formula() {
        assert_eq!(encode(0, 0, 0, 0, 1), 1);
        assert_eq!(encode(0, 0, 0, 1, 0), 60);
        assert_eq!(encode(0, 0, 1, 0, 0), 1440);
        assert_eq!(encode(0, 1, 0, 0, 0), 43_200);
        assert_eq!(encode(1, 0, 0, 0, 0), 525_600);
        assert_eq!(
            encode(2017, 11, 20, 13, 30),
            30 + 13 * 60 + 20 * 1440 + 11 * 43_200 + 2017 * 525_600
        );
    }

    #[test]
    fn test_encode_monotonic_within_day() {
        let mut previous = None;
        for hour in 0..24 {
            for minute in 0..60 {
                let key = encode(2017, 11, 20, hour, minute);
                if let Some(prev) = previous {
                    assert!(key > prev, "{hour}:{minute} did not increase the key");
                }
                previous = Some(key);
            }
        }
    }

    #[test]
    fn test_encode_monotonic_in_date_components() {
        let base = encode(2017, 11, 20, 8, 15);
        assert!(encode(2017, 11, 21, 8, 15) > base);
        assert!(encode(2017, 12, 20, 8, 15) > base);
        assert!(encode(2018, 11, 20, 8, 15) > base);
        // Last minute of a day sorts before the first minute of the next.
        assert!(encode(2017, 11, 20, 23, 59) < encode(2017, 11, 21, 0, 0));
    }
}
