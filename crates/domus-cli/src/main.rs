//! domus CLI - build parametric buildings from the command line
//!
//! Composes a house from a TOML configuration, or runs a single generator,
//! and prints a summary of the resulting scene.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use domus::frame::{build_frame, FrameLayout, Section};
use domus::house::{compose, HouseConfig};
use domus::inspect::SceneStats;
use domus::lines::FsDrawings;
use domus::panel::{door, window, Depths};
use domus::Part;

#[derive(Parser)]
#[command(name = "domus")]
#[command(about = "Parametric building geometry generator", long_about = None)]
struct Cli {
    /// Log generator details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the summary as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a house from a TOML configuration
    Build {
        /// Path to the house configuration
        config: PathBuf,
        /// Directory drawings are resolved against (default: the config's directory)
        #[arg(short, long)]
        base: Option<PathBuf>,
    },
    /// Build a space frame
    Frame {
        /// Beam section as x,z
        #[arg(long, value_delimiter = ',', required = true)]
        beam: Vec<f64>,
        /// Pillar section as x,y
        #[arg(long, value_delimiter = ',', required = true)]
        pillar: Vec<f64>,
        /// Distances between pillar axes
        #[arg(long, value_delimiter = ',', required = true)]
        spacings: Vec<f64>,
        /// Story heights, bottom to top
        #[arg(long, value_delimiter = ',', required = true)]
        heights: Vec<f64>,
        /// Reuse one grid for every story
        #[arg(long)]
        shared: bool,
    },
    /// Build a window or door panel
    Panel {
        /// Preset
        #[arg(value_enum)]
        kind: PanelKind,
        /// Column widths
        #[arg(long, value_delimiter = ',', required = true)]
        x_quotes: Vec<f64>,
        /// Row heights
        #[arg(long, value_delimiter = ',', required = true)]
        y_quotes: Vec<f64>,
        /// Glass and frame depth
        #[arg(long, value_delimiter = ',', default_values_t = [0.02, 0.06])]
        depths: Vec<f64>,
        /// Occupancy rows, bottom to top, e.g. `110,011` (1 = framing)
        #[arg(long, value_delimiter = ',', required = true)]
        rows: Vec<String>,
        /// Final scale as dx,dy,dz
        #[arg(long, value_delimiter = ',', default_values_t = [1.0, 1.0, 1.0])]
        scale: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PanelKind {
    Window,
    Door,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let part = match cli.command {
        Commands::Build { config, base } => build_house(&config, base)?,
        Commands::Frame {
            beam,
            pillar,
            spacings,
            heights,
            shared,
        } => {
            let layout = if shared {
                FrameLayout::Shared
            } else {
                FrameLayout::PerStory
            };
            let [bx, bz] = fixed::<2>("--beam", &beam)?;
            let [px, py] = fixed::<2>("--pillar", &pillar)?;
            build_frame(
                Section::new(bx, bz),
                Section::new(px, py),
                &spacings,
                &heights,
                layout,
            )?
        }
        Commands::Panel {
            kind,
            x_quotes,
            y_quotes,
            depths,
            rows,
            scale,
        } => {
            let occupancy = parse_rows(&rows)?;
            let [glass, frame] = fixed::<2>("--depths", &depths)?;
            let [dx, dy, dz] = fixed::<3>("--scale", &scale)?;
            let depths = Depths::new(glass, frame);
            let panel = match kind {
                PanelKind::Window => window(&x_quotes, &y_quotes, depths, &occupancy)?,
                PanelKind::Door => door(&x_quotes, &y_quotes, depths, &occupancy)?,
            };
            panel.scaled(dx, dy, dz)?
        }
    };

    print_stats(&part, cli.json)
}

fn build_house(config_path: &Path, base: Option<PathBuf>) -> Result<Part> {
    let config = HouseConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let base = base.unwrap_or_else(|| {
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    tracing::info!(config = %config_path.display(), base = %base.display(), "building house");
    Ok(compose(&config, &FsDrawings::new(base))?)
}

fn fixed<const N: usize>(flag: &str, values: &[f64]) -> Result<[f64; N]> {
    match <[f64; N]>::try_from(values) {
        Ok(array) => Ok(array),
        Err(_) => bail!("{flag} takes {N} comma-separated values, got {}", values.len()),
    }
}

fn parse_rows(rows: &[String]) -> Result<Vec<Vec<u8>>> {
    rows.iter()
        .map(|row| {
            row.chars()
                .map(|c| -> Result<u8> {
                    match c {
                        '0' => Ok(0),
                        '1' => Ok(1),
                        other => bail!("invalid occupancy flag {other:?} in row {row:?}"),
                    }
                })
                .collect()
        })
        .collect()
}

fn print_stats(part: &Part, json: bool) -> Result<()> {
    let stats = SceneStats::of(part.node());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", part.name);
    println!("  leaves:     {}", stats.leaves);
    println!("  cuboids:    {}", stats.cuboids);
    println!("  polyhedra:  {}", stats.polyhedra);
    println!("  extrusions: {}", stats.extrusions);
    println!("  textured:   {}", stats.textured);
    match stats.bounds {
        Some([min, max]) => println!(
            "  bounds:     [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            min[0], min[1], min[2], max[0], max[1], max[2]
        ),
        None => println!("  bounds:     empty"),
    }
    Ok(())
}
