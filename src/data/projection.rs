use std::fmt::Write as _;

use serde::Serialize;

use super::model::{Metric, MetricSelection, Reading};

// ---------------------------------------------------------------------------
// Projection – readings reduced to the enabled metric columns
// ---------------------------------------------------------------------------

/// One output row: the formatted timestamp plus the enabled metric values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedRow {
    /// `M/D/Y HH:MM`
    pub timestamp: String,
    #[serde(skip)]
    pub key: i64,
    pub values: Vec<i64>,
}

/// Column headers and rows for the table and chart views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    #[serde(skip)]
    pub metrics: Vec<Metric>,
    pub headers: Vec<&'static str>,
    pub rows: Vec<ProjectedRow>,
}

/// Project readings onto the enabled metrics, in canonical column order.
///
/// With nothing enabled there are no columns, but still one row per reading.
pub fn project(readings: &[Reading], selection: &MetricSelection) -> Projection {
    let metrics: Vec<Metric> = selection.enabled().collect();
    let headers = metrics.iter().map(Metric::label).collect();
    let rows = readings
        .iter()
        .map(|r| ProjectedRow {
            timestamp: r.timestamp.to_string(),
            key: r.key(),
            values: metrics.iter().map(|m| r.value(*m)).collect(),
        })
        .collect();

    Projection {
        metrics,
        headers,
        rows,
    }
}

impl Projection {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One `(key, value)` series per enabled metric, the shape a chart
    /// collaborator plots against time.
    pub fn series(&self) -> Vec<(Metric, Vec<(i64, i64)>)> {
        self.metrics
            .iter()
            .enumerate()
            .map(|(col, metric)| {
                let points = self.rows.iter().map(|row| (row.key, row.values[col])).collect();
                (*metric, points)
            })
            .collect()
    }

    /// Plain-text table with a leading `Time` column, right-aligned values.
    pub fn render_table(&self) -> String {
        const TIME_HEADER: &str = "Time";

        let time_width = self
            .rows
            .iter()
            .map(|r| r.timestamp.len())
            .chain(std::iter::once(TIME_HEADER.len()))
            .max()
            .unwrap_or_default();
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .map(|r| r.values[col].to_string().len())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{TIME_HEADER:<time_width$}");
        for (header, width) in self.headers.iter().zip(&widths) {
            let _ = write!(out, "  {header:>width$}");
        }
        out.push('\n');

        for row in &self.rows {
            let _ = write!(out, "{:<time_width$}", row.timestamp);
            for (value, width) in row.values.iter().zip(&widths) {
                let _ = write!(out, "  {value:>width$}");
            }
            out.push('\n');
        }
        out
    }
}
