//! # Arena Generator
//!
//! A single open room: floor everywhere except the outer ring.

use super::{GenerationConfig, MazeGenerator};
use crate::{Cell, Maze, MinotaurResult};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaMazeGenerator;

impl ArenaMazeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl MazeGenerator for ArenaMazeGenerator {
    fn generate(&self, config: &GenerationConfig, _rng: &mut StdRng) -> MinotaurResult<Maze> {
        let (width, height) = (config.width, config.height);
        let rows: Vec<Vec<Cell>> = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let boundary = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                        if boundary {
                            Cell::Wall
                        } else {
                            Cell::Floor
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(Maze::from_cells(&rows))
    }

    fn generator_type(&self) -> &'static str {
        "arena"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;

    #[test]
    fn test_arena_layout() {
        let config = GenerationConfig {
            width: 5,
            height: 4,
            ..GenerationConfig::default()
        };
        let maze = ArenaMazeGenerator
            .generate(&config, &mut create_rng(&config))
            .unwrap();
        assert_eq!(maze.to_string(), "#####\n#...#\n#...#\n#####\n");
        assert!(ArenaMazeGenerator.validate(&maze, &config).is_ok());
    }
}
