use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use super::filter;
use super::loader::{self, LineError};
use super::timekey;

// ---------------------------------------------------------------------------
// Timestamp – one minute-resolution clock reading
// ---------------------------------------------------------------------------

/// Calendar date plus 24-hour wall clock time, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Timestamp {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    /// Hour in 24-hour form, `0..=23`.
    pub hour: u32,
    pub minute: u32,
}

impl Timestamp {
    /// Build a timestamp, rejecting components outside their clock/calendar range.
    pub fn new(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> Result<Self, LineError> {
        check_range("month", month, 1, 12)?;
        check_range("day", day, 1, 31)?;
        check_range("hour", hour, 0, 23)?;
        check_range("minute", minute, 0, 59)?;
        Ok(Timestamp {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// Encoded key used for ordering and window comparisons.
    pub fn key(&self) -> i64 {
        timekey::encode(self.year, self.month, self.day, self.hour, self.minute)
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), LineError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(LineError::OutOfRange { field, value })
    }
}

/// `M/D/Y HH:MM` – hour and minute always two digits.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} {:02}:{:02}",
            self.month, self.day, self.year, self.hour, self.minute
        )
    }
}

/// Error returned when a user-supplied timestamp string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{input}': {kind}")]
pub struct TimestampParseError {
    pub input: String,
    #[source]
    pub kind: LineError,
}

/// Accepts the log's own `M/D/Y H:MM AM` form as well as 24-hour `M/D/Y HH:MM`.
impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let wrap = |kind: LineError| TimestampParseError {
            input: input.to_string(),
            kind,
        };

        let (date, time) = input
            .split_once(char::is_whitespace)
            .ok_or_else(|| wrap(LineError::Time(String::new())))?;
        let (month, day, year) = loader::parse_date(date).map_err(wrap)?;

        let time = time.trim();
        let (hour, minute) = if time.contains(char::is_whitespace) {
            loader::parse_time(time).map_err(wrap)?
        } else {
            loader::parse_clock(time).map_err(wrap)?
        };

        Timestamp::new(year, month, day, hour, minute).map_err(wrap)
    }
}

// ---------------------------------------------------------------------------
// Metric – the four power columns, in canonical order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Metric {
    Active,
    Complex,
    Apparent,
    Total,
}

impl Metric {
    /// Canonical column order, used for layout and headers alike.
    pub const ALL: [Metric; 4] = [
        Metric::Active,
        Metric::Complex,
        Metric::Apparent,
        Metric::Total,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Active => "Active Power",
            Metric::Complex => "Complex Power",
            Metric::Apparent => "Apparent Power",
            Metric::Total => "Total Power",
        }
    }

    fn index(&self) -> usize {
        match self {
            Metric::Active => 0,
            Metric::Complex => 1,
            Metric::Apparent => 2,
            Metric::Total => 3,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Metric::Active),
            "complex" => Ok(Metric::Complex),
            "apparent" => Ok(Metric::Apparent),
            "total" => Ok(Metric::Total),
            other => Err(format!(
                "unknown metric '{other}' (expected active, complex, apparent or total)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading – one line of the meter log
// ---------------------------------------------------------------------------

/// A single parsed log line. Metric values are the integer part of the
/// logged decimal (truncated, not rounded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub timestamp: Timestamp,
    pub active_power: i64,
    pub complex_power: i64,
    pub apparent_power: i64,
    pub total_power: i64,
}

impl Reading {
    pub fn key(&self) -> i64 {
        self.timestamp.key()
    }

    pub fn value(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Active => self.active_power,
            Metric::Complex => self.complex_power,
            Metric::Apparent => self.apparent_power,
            Metric::Total => self.total_power,
        }
    }
}

// ---------------------------------------------------------------------------
// MetricSelection – which columns are enabled
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricSelection {
    flags: [bool; 4],
}

impl MetricSelection {
    pub fn all() -> Self {
        MetricSelection { flags: [true; 4] }
    }

    pub fn none() -> Self {
        MetricSelection::default()
    }

    pub fn from_metrics<I: IntoIterator<Item = Metric>>(metrics: I) -> Self {
        let mut selection = MetricSelection::none();
        for metric in metrics {
            selection.set(metric, true);
        }
        selection
    }

    pub fn set(&mut self, metric: Metric, enabled: bool) {
        self.flags[metric.index()] = enabled;
    }

    pub fn is_enabled(&self, metric: Metric) -> bool {
        self.flags[metric.index()]
    }

    /// Enabled metrics in canonical order.
    pub fn enabled(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL.into_iter().filter(move |m| self.is_enabled(*m))
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}

// ---------------------------------------------------------------------------
// TimeWindow – inclusive range of encoded keys
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` range over encoded keys. No ordering check is
/// made; a window with `start > end` simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn between(start: &Timestamp, end: &Timestamp) -> Self {
        TimeWindow::new(start.key(), end.key())
    }

    /// Window that matches every reading.
    pub fn unbounded() -> Self {
        TimeWindow::new(i64::MIN, i64::MAX)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.start <= key && key <= self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::unbounded()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the result of one load
// ---------------------------------------------------------------------------

/// Readings kept by one load, in file order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    readings: Vec<Reading>,
    window: TimeWindow,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>, window: TimeWindow) -> Self {
        Dataset { readings, window }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// Narrow to a sub-window without going back to the file.
    pub fn refilter(&self, window: &TimeWindow) -> Dataset {
        Dataset::new(filter::filter_readings(&self.readings, window), *window)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_display_pads_hour_and_minute() {
        let ts = Timestamp::new(2017, 11, 20, 3, 5).unwrap();
        assert_eq!(ts.to_string(), "11/20/2017 03:05");
        let ts = Timestamp::new(2017, 1, 2, 13, 30).unwrap();
        assert_eq!(ts.to_string(), "1/2/2017 13:30");
    }

    #[test]
    fn test_timestamp_new_rejects_out_of_range() {
        assert_eq!(
            Timestamp::new(2017, 13, 1, 0, 0),
            Err(LineError::OutOfRange {
                field: "month",
                value: 13
            })
        );
        assert!(Timestamp::new(2017, 1, 0, 0, 0).is_err());
        assert!(Timestamp::new(2017, 1, 1, 24, 0).is_err());
        assert!(Timestamp::new(2017, 1, 1, 0, 60).is_err());
    }

    #[test]
    fn test_timestamp_from_str_twelve_hour() {
        let ts: Timestamp = "11/20/2017 1:30 PM".parse().unwrap();
        assert_eq!(ts, Timestamp::new(2017, 11, 20, 13, 30).unwrap());
        let ts: Timestamp = "11/20/2017 12:00 AM".parse().unwrap();
        assert_eq!(ts.hour, 0);
    }

    #[test]
    fn test_timestamp_from_str_twenty_four_hour() {
        let ts: Timestamp = "11/20/2017 23:45".parse().unwrap();
        assert_eq!(ts, Timestamp::new(2017, 11, 20, 23, 45).unwrap());
    }

    #[test]
    fn test_timestamp_from_str_errors() {
        let err = "11/20/2017".parse::<Timestamp>().unwrap_err();
        assert_eq!(err.input, "11/20/2017");
        assert!("11-20-2017 1:30 PM".parse::<Timestamp>().is_err());
        assert!("11/20/2017 1:30 XM".parse::<Timestamp>().is_err());
        assert!("11/20/2017 24:00".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_selection_enabled_is_canonical_order() {
        let selection = MetricSelection::from_metrics([Metric::Total, Metric::Active]);
        let enabled: Vec<Metric> = selection.enabled().collect();
        assert_eq!(enabled, vec![Metric::Active, Metric::Total]);
        assert_eq!(selection.count(), 2);
        assert_eq!(MetricSelection::none().enabled().count(), 0);
        assert_eq!(MetricSelection::all().count(), 4);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Apparent".parse::<Metric>(), Ok(Metric::Apparent));
        assert!("reactive".parse::<Metric>().is_err());
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = TimeWindow::new(100, 200);
        assert!(window.contains(100));
        assert!(window.contains(200));
        assert!(!window.contains(99));
        assert!(!window.contains(201));
        assert!(TimeWindow::unbounded().contains(i64::MIN));
    }
}
