//! # Deluge Dungeon Generator CLI
//!
//! Generates one level, optionally validates it, and prints or saves the result.

use clap::Parser;
use deluge::{
    render_ascii, CoreAccess, DungeonConfig, DungeonGenerator, DungeonResult, Generator,
};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

/// Command line arguments for the dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "deluge")]
#[command(about = "Procedural wrap-around dungeon generator for Into The Deluge")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Floor depth; scales traps, hidden rooms and enemy counts
    #[arg(short, long, default_value_t = 1)]
    floor: u32,

    /// JSON configuration file; omitted keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the torch-gated core variant
    #[arg(long)]
    torch_gated: bool,

    /// Print the level as ASCII
    #[arg(long)]
    ascii: bool,

    /// Write the level as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Check connectivity, boss perimeter and wrap tunnels
    #[arg(long)]
    validate: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> DungeonResult<()> {
    info!("Deluge dungeon generator v{}", deluge::VERSION);

    let mut config = match &args.config {
        Some(path) => DungeonConfig::from_json_file(path)?,
        None => DungeonConfig::new(),
    };
    if args.torch_gated {
        config.core_access = CoreAccess::TorchGated;
    }

    let generator = DungeonGenerator::new(config)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Generating floor {} with seed {}", args.floor, seed);

    let grid = generator.generate_seeded(args.floor, seed);
    print_summary(&grid);

    if args.validate {
        generator.validate(&grid)?;
        info!("Validation passed");
    }

    if args.ascii {
        print!("{}", render_ascii(&grid));
    }

    if let Some(path) = &args.json {
        std::fs::write(path, grid.to_json()?)?;
        info!("Wrote level to {}", path.display());
    }

    Ok(())
}

fn print_summary(grid: &deluge::DungeonGrid) {
    let report = &grid.report;
    info!(
        "{}x{} tiles, {} rooms ({}/{} generic), {} corridors (+{} redundant)",
        grid.width,
        grid.height,
        grid.rooms.len(),
        report.rooms.achieved,
        report.rooms.requested,
        report.corridors,
        report.extra_corridors
    );
    info!(
        "{}/{} wrap tunnels, {} boss entries, {} chests, {} trapped chests",
        report.wrap_tunnels.achieved,
        report.wrap_tunnels.requested,
        report.boss_entries,
        report.chests,
        report.trapped_chests
    );
    info!(
        "{}/{} hidden rooms, {}/{} destructibles, {} spawn points",
        report.hidden_rooms.achieved,
        report.hidden_rooms.requested,
        report.destructibles.achieved,
        report.destructibles.requested,
        grid.spawn_points.len()
    );
}
