use anyhow::{bail, Context};
use clap::Parser;
use generator::profile::{build_race, GeneratorConfig};
use report_bridge::bridge::{bridge_bind_address, ReportBridge};
use report_bridge::model::ReportModel;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{RaceData, Runner, Selection};
use workflow::summary::render_result;

mod generator;
mod report_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Speed-over-ground analysis for yacht race tracks")]
struct Args {
    /// Positions JSON: an array of `{id, moments: [{at, lat, lon}]}`
    #[arg(long, requires = "setup")]
    positions: Option<PathBuf>,
    /// Race setup JSON with course, tags and teams
    #[arg(long)]
    setup: Option<PathBuf>,
    /// Race identifier; defaults to the positions file stem
    #[arg(long)]
    race_id: Option<String>,
    /// Analyse a seeded synthetic race instead of files
    #[arg(long, default_value_t = false, conflicts_with = "positions")]
    synthetic: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Write the effective workflow config back to YAML
    #[arg(long)]
    save_workflow: Option<PathBuf>,
    #[arg(long)]
    boat: Option<u64>,
    /// Class key such as `irc1`
    #[arg(long, conflicts_with = "boat")]
    class: Option<String>,
    /// Show unfiltered, unsmoothed speeds
    #[arg(long, default_value_t = false)]
    raw: bool,
    /// Glitch distance in nautical miles
    #[arg(long)]
    dist_nm: Option<f64>,
    #[arg(long)]
    percentile: Option<f64>,
    /// Smoothing window length; 1 disables smoothing
    #[arg(long)]
    smooth_len: Option<usize>,
    /// Write the chart report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the HTTP report bridge alive
    #[arg(long, default_value_t = false)]
    serve: bool,
}

impl Args {
    fn selection(&self) -> Selection {
        match (&self.boat, &self.class) {
            (Some(id), _) => Selection::Boat(*id),
            (None, Some(class)) => Selection::Class(class.clone()),
            (None, None) => Selection::Fleet,
        }
    }

    fn race(&self) -> anyhow::Result<RaceData> {
        if self.synthetic {
            let mut config = GeneratorConfig::default();
            if let Some(seed) = self.seed {
                config.seed = seed;
            }
            let mut race = build_race(&config)?;
            if let Some(race_id) = &self.race_id {
                race.race_id = race_id.clone();
            }
            return Ok(race);
        }

        let (Some(positions), Some(setup)) = (&self.positions, &self.setup) else {
            bail!("either --synthetic or both --positions and --setup are required");
        };
        let race_id = match &self.race_id {
            Some(id) => id.clone(),
            None => positions
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "race".to_string()),
        };
        RaceData::load(&race_id, setup.as_path(), positions.as_path())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base_config = match &args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    };
    let workflow_config =
        base_config.with_overrides(args.dist_nm, args.percentile, args.smooth_len, args.raw);
    if let Some(path) = &args.save_workflow {
        workflow_config.save(path)?;
    }

    let race = args.race()?;
    let runner = Arc::new(Runner::new(workflow_config));
    let bridge = ReportBridge::new(runner.clone());

    let result = runner.execute(&race, &args.selection())?;
    print!("{}", render_result(&result, race.setup.waypoints()));

    let model = ReportModel::from_result(&result);
    if let Some(report_path) = &args.report {
        if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&model).context("serializing report")?;
        fs::write(report_path, json)
            .with_context(|| format!("writing report {}", report_path.display()))?;
    }
    bridge.publish(&model)?;

    if args.serve {
        let _server = bridge.serve(bridge_bind_address());
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
