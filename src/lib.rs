//! Power-meter log viewer core.
//!
//! Loads a tab-separated meter log into a [`Dataset`] filtered to a
//! [`TimeWindow`], projects it onto a [`MetricSelection`] for table or chart
//! views, and exports the selection as CSV.

pub mod data;

pub use data::export::{export, write_export, ExportError};
pub use data::filter::filter_readings;
pub use data::loader::{load_file, parse_line, parse_reader, LineError, ParseError};
pub use data::model::{
    Dataset, Metric, MetricSelection, Reading, TimeWindow, Timestamp, TimestampParseError,
};
pub use data::projection::{project, ProjectedRow, Projection};
pub use data::timekey::{encode, to_24_hour, Meridiem};
