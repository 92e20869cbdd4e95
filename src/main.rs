//! # Minotaur Main Entry Point
//!
//! Generates a maze, drops a runner and a goal into it and steps the runner
//! until it arrives, gets stuck, or runs out of moves.

use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use minotaur::generation::utils::generate_maze;
use minotaur::{
    advance, positions_of, AStarRunner, Direction, Entity, EntityKind, GenerationConfig,
    GeneratorAlgorithm, Maze, MazeEntity, MinotaurError, MinotaurResult, Position, Runner,
    SearchConfig, SimpletonRunner,
};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerKind {
    Astar,
    Simpleton,
}

/// Command line arguments for the Minotaur simulation.
#[derive(Parser, Debug)]
#[command(name = "minotaur")]
#[command(about = "Runs maze runners against generated mazes")]
#[command(version)]
struct Args {
    /// Maze width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Maze height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Random seed for maze generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maze generator (dfs, arena)
    #[arg(short, long)]
    generator: Option<GeneratorAlgorithm>,

    /// Runner that chases the goal
    #[arg(short, long, value_enum, default_value_t = RunnerKind::Astar)]
    runner: RunnerKind,

    /// Maximum number of moves to simulate
    #[arg(long, default_value_t = minotaur::config::DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Expansion budget for each A* search
    #[arg(long)]
    max_expansions: Option<usize>,

    /// JSON generation and search config; command line flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> MinotaurResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Minotaur v{}", minotaur::VERSION);

    let config = build_generation_config(&args)?;
    let mut maze = generate_maze(&config)?;

    let search = build_search_config(&args)?;
    let start = start_position(&maze)?;
    match args.runner {
        RunnerKind::Astar => {
            run_simulation(&mut maze, AStarRunner::with_config(start, search), args.max_steps)
        }
        RunnerKind::Simpleton => {
            run_simulation(&mut maze, SimpletonRunner::new(start), args.max_steps)
        }
    }
}

/// Initializes env_logger at the requested level.
fn initialize_logging(log_level: &str) -> MinotaurResult<()> {
    let level = log::LevelFilter::from_str(log_level).map_err(|_| {
        MinotaurError::InvalidConfig(format!("unknown log level '{}'", log_level))
    })?;

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();

    Ok(())
}

/// Loads the config file if given, then applies command line overrides.
fn build_generation_config(args: &Args) -> MinotaurResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading generation config from {}", path.display());
            GenerationConfig::from_json_file(path)?
        }
        None => GenerationConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(algorithm) = args.generator {
        config.algorithm = algorithm;
    }

    config.validate()?;
    Ok(config)
}

/// Reads search settings from the same config file, then applies overrides.
fn build_search_config(args: &Args) -> MinotaurResult<SearchConfig> {
    let mut search = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if args.max_expansions.is_some() {
        search.max_expansions = args.max_expansions;
    }
    debug!("search config: {:?}", search);
    Ok(search)
}

fn start_position(maze: &Maze) -> MinotaurResult<Position> {
    maze.floor_positions()
        .first()
        .copied()
        .ok_or_else(|| MinotaurError::InvalidConfig("maze has no floor".to_string()))
}

/// Places a goal on the last floor cell and steps `runner` toward it.
fn run_simulation<R: Runner>(
    maze: &mut Maze,
    mut runner: R,
    max_steps: usize,
) -> MinotaurResult<()> {
    let floors = maze.floor_positions();
    let goal_position = floors
        .last()
        .copied()
        .ok_or_else(|| MinotaurError::InvalidConfig("maze has no floor".to_string()))?;
    let goal = MazeEntity::new(EntityKind::Goal, goal_position);

    maze.add_entity(&goal)?;
    maze.add_entity(&runner)?;
    info!(
        "{} runner starts at {}, goal at {}",
        runner.name(),
        runner.position(),
        goal.position()
    );

    let goals = positions_of(std::slice::from_ref(&goal));
    let mut steps = 0;
    while runner.position() != goal.position() {
        if steps == max_steps {
            warn!("Gave up after {} steps at {}", steps, runner.position());
            break;
        }
        let direction = advance(maze, &mut runner, &goals)?;
        if direction == Direction::None {
            warn!("Runner stuck at {} after {} steps", runner.position(), steps);
            break;
        }
        steps += 1;
        debug!("step {}: {:?} to {}", steps, direction, runner.position());
    }

    if runner.position() == goal.position() {
        info!("Runner reached the goal in {} steps", steps);
    }
    println!("{}", maze);
    Ok(())
}
