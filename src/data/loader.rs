use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Dataset, Metric, Reading, TimeWindow, Timestamp};
use super::timekey::{self, Meridiem};

/// Number of tab-separated fields a data line must carry.
pub const FIELD_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single log line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected at least {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid date '{0}', expected M/D/Y")]
    Date(String),
    #[error("invalid time '{0}', expected H:MM AM/PM")]
    Time(String),
    #[error("missing or unknown AM/PM marker in '{0}'")]
    Meridiem(String),
    #[error("invalid {metric} value '{text}'")]
    Metric { metric: Metric, text: String },
    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: u32 },
    #[error("line is not valid UTF-8 (byte {valid_up_to})")]
    Encoding { valid_up_to: usize },
}

/// Failure to turn a meter log into a [`Dataset`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// I/O failure from a bare reader, which has no path to report.
    #[error("reading line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {kind}")]
    Malformed {
        /// 1-based, the header being line 1.
        line: usize,
        #[source]
        kind: LineError,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a meter log, keeping only readings inside `window`.
///
/// File layout: one header line (ignored), then tab-separated rows of
/// `M/D/Y`, `H:MM AM|PM`, active, complex, apparent and total power.
pub fn load_file(path: &Path, window: &TimeWindow) -> Result<Dataset, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_reader(BufReader::new(file), window).map_err(|e| match e {
        ParseError::Read { source, .. } => ParseError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    log::info!(
        "Loaded {} readings from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse a meter log from any buffered reader. Filtering happens in the same
/// pass; readings outside `window` are dropped as they are read.
///
/// Lines are read as raw bytes; the header is never decoded, so it may carry
/// non-UTF-8 unit symbols.
pub fn parse_reader<R: BufRead>(mut reader: R, window: &TimeWindow) -> Result<Dataset, ParseError> {
    let mut readings = Vec::new();
    let mut skipped = 0usize;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        line_no += 1;
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ParseError::Read {
                line: line_no,
                source,
            })?;
        if read == 0 {
            break;
        }
        // Header
        if line_no == 1 {
            continue;
        }

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = std::str::from_utf8(bytes).map_err(|e| ParseError::Malformed {
            line: line_no,
            kind: LineError::Encoding {
                valid_up_to: e.valid_up_to(),
            },
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let reading = parse_line(line).map_err(|kind| ParseError::Malformed {
            line: line_no,
            kind,
        })?;

        if window.contains(reading.key()) {
            readings.push(reading);
        } else {
            skipped += 1;
        }
    }

    log::debug!(
        "Parsed {} readings, {skipped} outside window [{}, {}]",
        readings.len(),
        window.start,
        window.end
    );
    Ok(Dataset::new(readings, *window))
}

/// Parse one data line of the meter log.
pub fn parse_line(line: &str) -> Result<Reading, LineError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < FIELD_COUNT {
        return Err(LineError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let (month, day, year) = parse_date(fields[0])?;
    let (hour, minute) = parse_time(fields[1])?;
    let timestamp = Timestamp::new(year, month, day, hour, minute)?;

    Ok(Reading {
        timestamp,
        active_power: parse_metric(Metric::Active, fields[2])?,
        complex_power: parse_metric(Metric::Complex, fields[3])?,
        apparent_power: parse_metric(Metric::Apparent, fields[4])?,
        total_power: parse_metric(Metric::Total, fields[5])?,
    })
}

// ---------------------------------------------------------------------------
// Field grammar
// ---------------------------------------------------------------------------

/// `M/D/Y` → `(month, day, year)`.
pub(crate) fn parse_date(text: &str) -> Result<(u32, u32, u32), LineError> {
    let err = || LineError::Date(text.to_string());
    let mut parts = text.trim().split('/');
    let mut next = || -> Result<u32, LineError> {
        parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .ok_or_else(err)
    };
    let month = next()?;
    let day = next()?;
    let year = next()?;
    if parts.next().is_some() {
        return Err(err());
    }
    Ok((month, day, year))
}

/// `H:MM[:SS] AM|PM` → `(hour24, minute)`.
pub(crate) fn parse_time(text: &str) -> Result<(u32, u32), LineError> {
    let mut tokens = text.split_whitespace();
    let clock = tokens
        .next()
        .ok_or_else(|| LineError::Time(text.to_string()))?;
    let meridiem = tokens
        .next()
        .and_then(Meridiem::from_marker)
        .ok_or_else(|| LineError::Meridiem(text.to_string()))?;

    let (hour, minute) = parse_clock(clock)?;
    if hour > 12 {
        return Err(LineError::OutOfRange {
            field: "hour",
            value: hour,
        });
    }
    Ok((timekey::to_24_hour(hour, meridiem), minute))
}

/// `H:MM[:SS]` → `(hour, minute)`; seconds are accepted and dropped.
pub(crate) fn parse_clock(text: &str) -> Result<(u32, u32), LineError> {
    let err = || LineError::Time(text.to_string());
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(err());
    }
    let hour = parts[0].parse::<u32>().map_err(|_| err())?;
    let minute = parts[1].parse::<u32>().map_err(|_| err())?;
    if let Some(seconds) = parts.get(2) {
        seconds.parse::<u32>().map_err(|_| err())?;
    }
    Ok((hour, minute))
}

/// Keep the integer part of a logged decimal: `"500.9"` → `500`, `"-12.5"` → `-12`.
fn parse_metric(metric: Metric, text: &str) -> Result<i64, LineError> {
    let integer_part = text.trim().split('.').next().unwrap_or_default();
    integer_part.parse::<i64>().map_err(|_| LineError::Metric {
        metric,
        text: text.to_string(),
    })
}
