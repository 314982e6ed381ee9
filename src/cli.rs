use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use meter_viewer::{Metric, MetricSelection, TimeWindow, Timestamp};

#[derive(Parser)]
#[command(name = "meter-viewer")]
#[command(about = "Inspect and export power-meter logs by time window and metric")]
#[command(version)]
#[command(after_help = "\
TIMESTAMPS:
    Either the log's own clock format or 24-hour time:
        \"11/20/2017 1:30 PM\"
        \"11/20/2017 13:30\"

EXAMPLES:
    meter-viewer table \"MEAS 112 -- SD Card.txt\" --from \"11/20/2017 12:00 AM\" --to \"11/20/2017 1:00 AM\"
    meter-viewer table log.txt --metric active --metric total --json
    meter-viewer export log.txt exported_data.csv --metric apparent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the selected readings as a table
    Table {
        #[command(flatten)]
        query: Query,

        /// Print headers and rows as JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Write the selected readings to a CSV file (overwrites it)
    Export {
        #[command(flatten)]
        query: Query,

        /// Destination CSV file
        output: PathBuf,
    },
}

/// Log file, time window and metric toggles shared by every command.
#[derive(Args)]
pub struct Query {
    /// Meter log (tab-separated, one header line)
    pub log: PathBuf,

    /// Start of the time window, inclusive (open if omitted)
    #[arg(long)]
    pub from: Option<Timestamp>,

    /// End of the time window, inclusive (open if omitted)
    #[arg(long)]
    pub to: Option<Timestamp>,

    /// Metric column to include; repeat for several. Defaults to all four
    #[arg(short, long = "metric", value_enum)]
    pub metrics: Vec<MetricArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Active,
    Complex,
    Apparent,
    Total,
    /// No metric columns, timestamps only
    None,
}

impl Query {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(
            self.from.as_ref().map_or(i64::MIN, Timestamp::key),
            self.to.as_ref().map_or(i64::MAX, Timestamp::key),
        )
    }

    pub fn selection(&self) -> MetricSelection {
        if self.metrics.is_empty() {
            return MetricSelection::all();
        }
        MetricSelection::from_metrics(self.metrics.iter().filter_map(|m| match m {
            MetricArg::Active => Some(Metric::Active),
            MetricArg::Complex => Some(Metric::Complex),
            MetricArg::Apparent => Some(Metric::Apparent),
            MetricArg::Total => Some(Metric::Total),
            MetricArg::None => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(args: &[&str]) -> Query {
        let mut argv = vec!["meter-viewer", "table", "log.txt"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Table { query, .. } => query,
            Commands::Export { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_default_query_is_open_and_all_metrics() {
        let q = query(&[]);
        assert_eq!(q.window(), TimeWindow::unbounded());
        assert_eq!(q.selection(), MetricSelection::all());
    }

    #[test]
    fn test_window_from_timestamps() {
        let q = query(&["--from", "11/20/2017 12:00 AM", "--to", "11/20/2017 01:00"]);
        let start = Timestamp::new(2017, 11, 20, 0, 0).unwrap();
        let end = Timestamp::new(2017, 11, 20, 1, 0).unwrap();
        assert_eq!(q.window(), TimeWindow::between(&start, &end));
    }

    #[test]
    fn test_metric_flags() {
        let q = query(&["--metric", "total", "-m", "active"]);
        assert_eq!(
            q.selection(),
            MetricSelection::from_metrics([Metric::Active, Metric::Total])
        );
        assert_eq!(query(&["--metric", "none"]).selection(), MetricSelection::none());
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let result = Cli::try_parse_from(["meter-viewer", "table", "log.txt", "--from", "yesterday"]);
        assert!(result.is_err());
    }
}
