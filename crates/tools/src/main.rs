use std::path::PathBuf;

use clap::{Parser, Subcommand};
use grid::{AngularStep, PointCap, generate_grid};
use tools::{
    EstimateSummary, ToolError, graticule_vertices, load_config, texture_listing,
    write_f32_file,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Point-grid and graticule generator for the globe viewer")]
struct Args {
    /// Viewer config (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print counts, stride and memory for a step without generating
    Estimate {
        /// Angular step in degrees
        #[arg(long)]
        step: AngularStep,

        /// Point cap (defaults to the config's)
        #[arg(long)]
        cap: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a grid and optionally write it as raw little-endian f32 xyz
    Generate {
        #[arg(long)]
        step: AngularStep,

        #[arg(long)]
        cap: Option<usize>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Build the graticule and optionally write its line-list vertices
    Graticule {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the globe textures
    Textures,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ToolError> {
    let config = load_config(args.config.as_deref())?;
    let cap_or_default = |cap: Option<usize>| match cap {
        Some(n) => PointCap::new(n),
        None => Ok(config.point_cap),
    };

    match args.command {
        Command::Estimate { step, cap, json } => {
            let summary = EstimateSummary::new(step, cap_or_default(cap)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for line in summary.lines() {
                    println!("{line}");
                }
            }
        }
        Command::Generate { step, cap, out } => {
            let cap = cap_or_default(cap)?;
            let grid = generate_grid(step, cap, config.grid);
            for line in EstimateSummary::new(step, cap).lines() {
                println!("{line}");
            }
            if let Some(path) = out {
                write_f32_file(&path, &grid.positions)?;
                info!(path = %path.display(), points = grid.count, "wrote grid");
            }
        }
        Command::Graticule { out } => {
            let (graticule, vertices) = graticule_vertices(&config);
            println!(
                "lines: {} ({} parallels, {} meridians)",
                graticule.line_count(),
                graticule.parallels.len(),
                graticule.meridians.len()
            );
            println!("vertices: {}", vertices.len() / 3);
            if let Some(path) = out {
                write_f32_file(&path, &vertices)?;
                info!(path = %path.display(), "wrote graticule");
            }
        }
        Command::Textures => {
            for line in texture_listing(&config) {
                println!("{line}");
            }
        }
    }
    Ok(())
}
