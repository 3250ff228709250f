use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::info;
use simplelog::LevelFilter;

use quadtree_dungeon::{DungeonConfig, DungeonGenerator, PngCheckpoints, TileKind};

/// Generate a dungeon level from a seed
#[derive(Parser, Debug)]
#[command(name = "quadtree-dungeon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for the run; the same seed always gives the same level
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Map width in tiles, overriding the config file
    #[arg(long)]
    width: Option<usize>,

    /// Map height in tiles, overriding the config file
    #[arg(long)]
    height: Option<usize>,

    /// JSON file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a PNG per checkpoint into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Print the finished level as ASCII, north up
    #[arg(long)]
    ascii: bool,

    /// Print the finished level as JSON
    #[arg(long)]
    json: bool,

    /// Serve puffin profiling data while generating
    #[arg(long)]
    profile: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let _profiler = if args.profile {
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        let server = puffin_http::Server::new(&addr)?;
        puffin::set_scopes_on(true);
        info!("puffin server listening on {addr}");
        Some(server)
    } else {
        None
    };

    let mut config = match &args.config {
        Some(path) => DungeonConfig::from_json_file(path)?,
        None => DungeonConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let mut generator = DungeonGenerator::new(config)?;
    let dungeon = match &args.export_dir {
        Some(dir) => generator.generate_with(args.seed, &mut PngCheckpoints::new(dir))?,
        None => generator.generate(args.seed)?,
    };
    puffin::GlobalProfiler::lock().new_frame();

    dungeon.log_rooms();
    info!(
        "seed {}: {} corridor tiles, {} doors, {} walls",
        dungeon.seed,
        dungeon.grid.count(TileKind::Corridor),
        dungeon.grid.count(TileKind::Door),
        dungeon.grid.count(TileKind::Wall) + dungeon.grid.count(TileKind::WallCorner),
    );

    if args.ascii {
        print!("{}", dungeon.grid);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(dungeon)?);
    }
    Ok(())
}
