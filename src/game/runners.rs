//! # Runners
//!
//! Entities that choose their own next move each tick.

use crate::utils::pathfinding::{Pathfinder, SearchConfig};
use crate::{new_entity_id, Direction, Entity, EntityId, Maze, MinotaurResult, Position};

/// An entity that decides where to go next.
pub trait Runner: Entity {
    /// Short human-readable name for logs.
    fn name(&self) -> &str;

    /// Chooses the next move toward `goals`. `Direction::None` means stay.
    ///
    /// `goals` is a snapshot taken by the caller for this decision.
    fn next_move(&self, maze: &Maze, goals: &[Position]) -> MinotaurResult<Direction>;
}

/// Asks `runner` for its move and applies it to both the runner and the maze
/// index. Moves into impassable cells are ignored.
///
/// Returns the direction actually taken.
pub fn advance<R: Runner + ?Sized>(
    maze: &mut Maze,
    runner: &mut R,
    goals: &[Position],
) -> MinotaurResult<Direction> {
    let direction = runner.next_move(maze, goals)?;
    if direction == Direction::None {
        return Ok(Direction::None);
    }

    match runner.position().step(direction) {
        Some(target) if maze.is_passable(target) => {
            maze.move_entity(runner, target)?;
            Ok(direction)
        }
        target => {
            log::debug!(
                "{} {} tried to move {:?} from {} into {:?}",
                runner.name(),
                runner.id(),
                direction,
                runner.position(),
                target
            );
            Ok(Direction::None)
        }
    }
}

/// Follows shortest routes computed by the A* engine.
#[derive(Debug, Clone)]
pub struct AStarRunner {
    id: EntityId,
    position: Position,
    pathfinder: Pathfinder,
}

impl AStarRunner {
    pub fn new(position: Position) -> Self {
        Self::with_config(position, SearchConfig::default())
    }

    pub fn with_config(position: Position, config: SearchConfig) -> Self {
        Self {
            id: new_entity_id(),
            position,
            pathfinder: Pathfinder::new(config),
        }
    }
}

impl Entity for AStarRunner {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl Runner for AStarRunner {
    fn name(&self) -> &str {
        "astar"
    }

    fn next_move(&self, maze: &Maze, goals: &[Position]) -> MinotaurResult<Direction> {
        self.pathfinder
            .next_step(self.position, goals, |position| maze.is_passable(position))
    }
}

/// Greedy runner: steps to whichever neighbour is strictly closer to the
/// nearest goal. Gets stuck behind any wall facing the goal.
#[derive(Debug, Clone)]
pub struct SimpletonRunner {
    id: EntityId,
    position: Position,
}

impl SimpletonRunner {
    pub fn new(position: Position) -> Self {
        Self {
            id: new_entity_id(),
            position,
        }
    }
}

impl Entity for SimpletonRunner {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl Runner for SimpletonRunner {
    fn name(&self) -> &str {
        "simpleton"
    }

    fn next_move(&self, maze: &Maze, goals: &[Position]) -> MinotaurResult<Direction> {
        let Some(goal) = goals
            .iter()
            .copied()
            .min_by_key(|goal| self.position.manhattan_distance(*goal))
        else {
            return Ok(Direction::None);
        };

        let mut best_distance = self.position.manhattan_distance(goal);
        let mut best = Direction::None;
        for direction in Direction::CARDINAL {
            let Some(candidate) = self.position.step(direction) else {
                continue;
            };
            if !maze.is_passable(candidate) {
                continue;
            }
            let distance = candidate.manhattan_distance(goal);
            if distance < best_distance {
                best_distance = distance;
                best = direction;
            }
        }
        Ok(best)
    }
}
