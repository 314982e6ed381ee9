use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{MetricSelection, Reading};
use super::projection::project;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write export to {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the selection to `destination`, replacing any existing content.
///
/// Rows are rendered in memory first, so the file is only touched once the
/// whole export is ready.
pub fn export(
    readings: &[Reading],
    selection: &MetricSelection,
    destination: &Path,
) -> Result<(), ExportError> {
    let failure = |source| ExportError::IoFailure {
        path: destination.to_path_buf(),
        source,
    };
    let mut buffer = Vec::new();
    let rows = write_export(readings, selection, &mut buffer).map_err(failure)?;
    std::fs::write(destination, &buffer).map_err(failure)?;
    log::info!(
        "Exported {rows} rows ({} metrics) to {}",
        selection.count(),
        destination.display()
    );
    Ok(())
}

/// Write one CSV row per reading, no header row:
///
/// ```text
/// 11/20/2017 13:30, Active Power: 500, Total Power: 1500
/// ```
///
/// Each metric field keeps its leading space and label. Lines end in CRLF.
/// Returns the number of rows written; CSV errors surface as `io::Error`.
pub fn write_export<W: Write>(
    readings: &[Reading],
    selection: &MetricSelection,
    writer: W,
) -> io::Result<usize> {
    let projection = project(readings, selection);
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    for row in &projection.rows {
        let mut fields = Vec::with_capacity(row.values.len() + 1);
        fields.push(row.timestamp.clone());
        for (label, value) in projection.headers.iter().zip(&row.values) {
            fields.push(format!(" {label}: {value}"));
        }
        csv_writer.write_record(&fields)?;
    }
    csv_writer.flush()?;

    Ok(projection.len())
}
