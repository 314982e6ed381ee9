mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands, Query};
use meter_viewer::{data::loader, export, project, Dataset};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Table { query, json } => {
            let dataset = load(&query)?;
            let projection = project(dataset.readings(), &query.selection());
            if json {
                let text = serde_json::to_string_pretty(&projection)
                    .context("serializing projection")?;
                println!("{text}");
            } else {
                print!("{}", projection.render_table());
                println!("{} readings", projection.len());
            }
        }
        Commands::Export { query, output } => {
            let dataset = load(&query)?;
            export(dataset.readings(), &query.selection(), &output)
                .with_context(|| format!("exporting to {}", output.display()))?;
            println!("Wrote {} rows to {}", dataset.len(), output.display());
        }
    }
    Ok(())
}

fn load(query: &Query) -> Result<Dataset> {
    let window = query.window();
    let dataset = loader::load_file(&query.log, &window)
        .with_context(|| format!("loading {}", query.log.display()))?;
    if dataset.is_empty() {
        log::warn!("No readings in {} fall inside the requested window", query.log.display());
    }
    Ok(dataset)
}
