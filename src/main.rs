use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use job_insights::config::Config;
use job_insights::{DashboardState, ViewId};

#[derive(Parser)]
#[command(name = "job-insights")]
#[command(about = "Precomputed chart views over a job postings dataset")]
#[command(version)]
struct Cli {
    /// Dataset file (.csv, .json or .parquet). Defaults to
    /// $JOB_INSIGHTS_DATASET, then filtered_dataset.csv next to the binary
    /// or in the working directory.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route name of every view
    Views,
    /// Print one view as JSON
    Show {
        /// Route name, e.g. 7_pie_skill_demand
        route: String,
    },
    /// Write every view to <out>/<route>.json
    Export {
        #[arg(long)]
        out: PathBuf,
        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print dataset and grouping totals
    Summary,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Views = cli.command {
        for id in ViewId::ALL {
            println!("{id}");
        }
        return Ok(());
    }

    let config = Config::from_env().with_dataset(cli.data);
    let state = DashboardState::from_config(&config).context("initializing dashboard state")?;

    match cli.command {
        Commands::Views => {}
        Commands::Show { route } => println!("{}", state.view_json(&route)?),
        Commands::Export { out, pretty } => export(&state, &out, pretty)?,
        Commands::Summary => summary(&state),
    }

    Ok(())
}

fn export(state: &DashboardState, out: &std::path::Path, pretty: bool) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    for (id, payload) in state.views() {
        let json = if pretty {
            serde_json::to_string_pretty(payload)?
        } else {
            serde_json::to_string(payload)?
        };
        let path = out.join(format!("{}.json", id.route()));
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn summary(state: &DashboardState) {
    let report = state.dataset().report();
    let agg = state.aggregates();
    let rows = [
        ("Rows read", report.rows_read),
        ("Postings kept", state.dataset().len()),
        ("Dropped (ctc)", report.dropped_compensation),
        ("Dropped (missing key)", report.dropped_missing_key),
        ("Skills", agg.skill_count.len()),
        ("Locations", agg.location_count.len()),
    ];
    for (label, value) in rows {
        println!("{label:<22} {value}");
    }
    if let Some(range) = agg.ctc_range {
        println!("{:<22} {:.0} - {:.0}", "CTC range", range.min, range.max);
    }
}
