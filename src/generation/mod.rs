//! # Generation Module
//!
//! Procedural maze generation.
//!
//! Generators are pure functions of a [`GenerationConfig`] and a seeded
//! random number generator, so a seed always reproduces the same maze.

pub mod arena;
pub mod dfs;

pub use arena::*;
pub use dfs::*;

use crate::{Maze, MinotaurError, MinotaurResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which generator builds the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorAlgorithm {
    /// Depth-first recursive backtracker: long corridors, every floor cell
    /// reachable.
    #[default]
    Dfs,
    /// One open room with a wall border.
    Arena,
}

impl fmt::Display for GeneratorAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorAlgorithm::Dfs => write!(f, "dfs"),
            GeneratorAlgorithm::Arena => write!(f, "arena"),
        }
    }
}

impl FromStr for GeneratorAlgorithm {
    type Err = MinotaurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(GeneratorAlgorithm::Dfs),
            "arena" => Ok(GeneratorAlgorithm::Arena),
            other => Err(MinotaurError::InvalidConfig(format!(
                "unknown generator '{}', expected 'dfs' or 'arena'",
                other
            ))),
        }
    }
}

/// Configuration for maze generation.
///
/// Deserializes from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Maze width in cells, border included
    pub width: usize,
    /// Maze height in cells, border included
    pub height: usize,
    /// Generator to use
    pub algorithm: GeneratorAlgorithm,
    /// Chance (0.0 to 1.0) that the depth-first generator knocks out a wall
    /// between two corridors, adding loops
    pub loop_chance: f64,
}

impl GenerationConfig {
    /// Creates a default-sized configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use minotaur::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: crate::config::DEFAULT_MAZE_WIDTH,
            height: crate::config::DEFAULT_MAZE_HEIGHT,
            algorithm: GeneratorAlgorithm::Dfs,
            loop_chance: 0.05,
        }
    }

    /// Small, loop-free mazes for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            width: 11,
            height: 11,
            loop_chance: 0.0,
            ..Self::new(seed)
        }
    }

    /// Checks that the configuration can produce a maze.
    pub fn validate(&self) -> MinotaurResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(MinotaurError::InvalidConfig(format!(
                "maze must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.loop_chance) {
            return Err(MinotaurError::InvalidConfig(format!(
                "loop_chance must be within [0, 1], got {}",
                self.loop_chance
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> MinotaurResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MinotaurResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for maze generators.
pub trait MazeGenerator {
    /// Builds a maze of `config.width` × `config.height` cells.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> MinotaurResult<Maze>;

    /// Checks a generated maze against the configuration it came from.
    fn validate(&self, maze: &Maze, config: &GenerationConfig) -> MinotaurResult<()> {
        utils::validate_maze(maze, config)
    }

    /// Short identifier used in logs.
    fn generator_type(&self) -> &'static str;
}

/// Generation helpers.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates the seeded generator for `config`.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Returns the generator selected by `algorithm`.
    pub fn generator_for(algorithm: GeneratorAlgorithm) -> Box<dyn MazeGenerator> {
        match algorithm {
            GeneratorAlgorithm::Dfs => Box::new(DfsMazeGenerator::new()),
            GeneratorAlgorithm::Arena => Box::new(ArenaMazeGenerator::new()),
        }
    }

    /// Validates `config`, generates a maze with the selected generator and
    /// validates the result.
    pub fn generate_maze(config: &GenerationConfig) -> MinotaurResult<Maze> {
        config.validate()?;
        let generator = generator_for(config.algorithm);
        let mut rng = create_rng(config);
        let maze = generator.generate(config, &mut rng)?;
        generator.validate(&maze, config)?;
        log::info!(
            "generated {}x{} maze with {} (seed {})",
            maze.width(),
            maze.height(),
            generator.generator_type(),
            config.seed
        );
        Ok(maze)
    }

    /// Checks dimensions and that there is somewhere to stand.
    pub fn validate_maze(maze: &Maze, config: &GenerationConfig) -> MinotaurResult<()> {
        if maze.width() != config.width || maze.height() != config.height {
            return Err(MinotaurError::InvalidConfig(format!(
                "generated {}x{} maze, expected {}x{}",
                maze.width(),
                maze.height(),
                config.width,
                config.height
            )));
        }
        if maze.floor_positions().is_empty() {
            return Err(MinotaurError::InvalidConfig(
                "generated maze has no floor cells".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.algorithm, GeneratorAlgorithm::Dfs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let tiny = GenerationConfig {
            width: 2,
            ..GenerationConfig::default()
        };
        assert!(matches!(tiny.validate(), Err(MinotaurError::InvalidConfig(_))));

        let bad_chance = GenerationConfig {
            loop_chance: 1.5,
            ..GenerationConfig::default()
        };
        assert!(bad_chance.validate().is_err());
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config =
            GenerationConfig::from_json_str(r#"{"seed": 9, "algorithm": "arena"}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.algorithm, GeneratorAlgorithm::Arena);
        assert_eq!(config.width, crate::config::DEFAULT_MAZE_WIDTH);

        assert!(matches!(
            GenerationConfig::from_json_str(r#"{"width": 1}"#),
            Err(MinotaurError::InvalidConfig(_))
        ));
        assert!(matches!(
            GenerationConfig::from_json_str("not json"),
            Err(MinotaurError::Serde(_))
        ));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("DFS".parse::<GeneratorAlgorithm>().unwrap(), GeneratorAlgorithm::Dfs);
        assert_eq!("arena".parse::<GeneratorAlgorithm>().unwrap(), GeneratorAlgorithm::Arena);
        assert!("prim".parse::<GeneratorAlgorithm>().is_err());
        assert_eq!(GeneratorAlgorithm::Arena.to_string(), "arena");
    }

    #[test]
    fn test_generate_maze_dispatches() {
        for algorithm in [GeneratorAlgorithm::Dfs, GeneratorAlgorithm::Arena] {
            let config = GenerationConfig {
                algorithm,
                ..GenerationConfig::for_testing(3)
            };
            let maze = utils::generate_maze(&config).unwrap();
            assert_eq!(maze.width(), 11);
            assert_eq!(maze.height(), 11);
        }
    }
}
