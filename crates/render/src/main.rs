//! gate-render - headless gate geometry pipeline
//!
//! Reads a gate spec from the resource root, runs the geometry and/or
//! accessory stage and writes OBJ/MTL files plus a render manifest.
//! A non-zero exit code means the requested stages did not all complete.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use file_format::load_gate_spec;
use gate_builder::pipeline::{GatePipeline, StageReport};
use gate_builder::PipelineConfig;
use tracing::{error, info, warn};

const SPEC_FILE: &str = "gate_spec.json";
const OUTPUT_DIR: &str = "render";

#[derive(Parser)]
#[command(name = "gate-render")]
#[command(about = "Parametric garage door geometry pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the gate body, write gate_data.json and gate.obj
    Geometry(StageArgs),

    /// Place accessories from gate_data.json and write scene.obj
    Accessories(StageArgs),

    /// Run both stages in one process
    Render(StageArgs),
}

#[derive(Args)]
struct StageArgs {
    /// Gate spec JSON (default: <RESOURCE_ROOT>/gate_spec.json)
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Output directory (default: <RESOURCE_ROOT>/render)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pipeline configuration override (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Diffuse texture (default: chosen from the gate colour)
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Resource root, passed after `--`
    #[arg(last = true, required = true)]
    resource_root: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stages {
    Geometry,
    Accessories,
    Both,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))
}

fn run(stages: Stages, args: StageArgs) -> Result<()> {
    let root = &args.resource_root;
    let spec_path = args.spec.clone().unwrap_or_else(|| root.join(SPEC_FILE));
    let out_dir = args.out.clone().unwrap_or_else(|| root.join(OUTPUT_DIR));

    let config = load_config(args.config.as_deref())?;
    let parsed = load_gate_spec(&spec_path).with_context(|| format!("loading gate spec {}", spec_path.display()))?;
    let spec = parsed.spec;

    let mut pipeline = GatePipeline::new(config);
    for message in parsed.warnings {
        warn!("{message}");
        pipeline.warnings.push(message);
    }

    let texture = match &args.texture {
        Some(path) => path.clone(),
        None => root.join(pipeline.texture_for(&spec)),
    };
    let texture = texture.display().to_string();
    info!(spec = %spec_path.display(), out = %out_dir.display(), %texture, "starting render");

    let mut reports: Vec<StageReport> = Vec::new();
    if stages != Stages::Accessories {
        reports.push(
            pipeline
                .run_geometry(&spec, &out_dir, &texture)
                .context("geometry stage failed")?,
        );
    }
    if stages != Stages::Geometry {
        reports.push(
            pipeline
                .run_accessories(&spec, &out_dir, &texture)
                .context("accessory stage failed")?,
        );
    }

    let manifest = pipeline.write_manifest(&spec, &out_dir, &reports)?;
    info!(
        manifest = %manifest.display(),
        warnings = pipeline.warnings.len(),
        "render complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (stages, args) = match cli.command {
        Commands::Geometry(args) => (Stages::Geometry, args),
        Commands::Accessories(args) => (Stages::Accessories, args),
        Commands::Render(args) => (Stages::Both, args),
    };

    match run(stages, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
