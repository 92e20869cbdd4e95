//! # Game Module
//!
//! Grid primitives, the maze with its live spatial index, entities and runners.
//!
//! - Grid coordinates and movement directions
//! - Maze cells and the position → entity index
//! - Entities that occupy the maze
//! - Runners that decide their own next move

pub mod entities;
pub mod maze;
pub mod runners;

pub use entities::*;
pub use maze::*;
pub use runners::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Represents a 2D coordinate in the maze.
///
/// `x` grows to the right and `y` grows downward.
///
/// # Examples
///
/// ```
/// use minotaur::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// assert_eq!(pos.cardinal_neighbours().count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use minotaur::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, -4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    ///
    /// Saturates at `u32::MAX` for points at opposite coordinate extremes.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Returns the position one step away in `direction`, or `None` if that
    /// would leave the `i32` coordinate range.
    pub fn step(self, direction: Direction) -> Option<Position> {
        let delta = direction.to_delta();
        Some(Self::new(
            self.x.checked_add(delta.x)?,
            self.y.checked_add(delta.y)?,
        ))
    }

    /// Yields the cardinal neighbours in Up, Down, Left, Right order.
    /// Neighbours outside the `i32` range are skipped.
    pub fn cardinal_neighbours(self) -> impl Iterator<Item = Position> {
        Direction::CARDINAL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// A single move on the 4-connected grid. `None` means "stay put".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// The four moving directions, in the order the search expands them.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use minotaur::{Direction, Position};
    ///
    /// assert_eq!(Direction::Up.to_delta(), Position::new(0, -1));
    /// assert_eq!(Direction::None.to_delta(), Position::origin());
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
            Direction::None => Position::new(0, 0),
        }
    }

    /// Converts a unit delta to a direction.
    ///
    /// Returns `Direction::None` for the zero delta and for anything that is
    /// not a single cardinal step.
    pub fn from_delta(delta: Position) -> Direction {
        match (delta.x, delta.y) {
            (0, -1) => Direction::Up,
            (0, 1) => Direction::Down,
            (-1, 0) => Direction::Left,
            (1, 0) => Direction::Right,
            _ => Direction::None,
        }
    }

    /// Direction of the single step from `from` to the adjacent `to`.
    pub fn between(from: Position, to: Position) -> Direction {
        Self::from_delta(to - from)
    }

    /// The direction that undoes this one.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

/// Unique identifier for maze entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
    }

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(-2, 1);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 8);
        assert_eq!(pos2.manhattan_distance(pos1), 8);
    }

    #[test]
    fn test_position_cardinal_neighbours() {
        let pos = Position::new(5, 5);
        let neighbours: Vec<Position> = pos.cardinal_neighbours().collect();
        assert_eq!(
            neighbours,
            vec![
                Position::new(5, 4),
                Position::new(5, 6),
                Position::new(4, 5),
                Position::new(6, 5),
            ]
        );
    }

    #[test]
    fn test_coordinate_extremes_do_not_overflow() {
        let low = Position::new(i32::MIN, i32::MIN);
        let high = Position::new(i32::MAX, i32::MAX);
        assert_eq!(low.manhattan_distance(high), u32::MAX);
        assert_eq!(high.manhattan_distance(low), u32::MAX);

        assert_eq!(high.step(Direction::Right), None);
        assert_eq!(high.step(Direction::Down), None);
        assert_eq!(high.step(Direction::Left), Some(Position::new(i32::MAX - 1, i32::MAX)));
        assert_eq!(low.step(Direction::Up), None);

        let corner: Vec<Position> = high.cardinal_neighbours().collect();
        assert_eq!(
            corner,
            vec![
                Position::new(i32::MAX, i32::MAX - 1),
                Position::new(i32::MAX - 1, i32::MAX),
            ]
        );
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_direction_round_trip() {
        for direction in Direction::CARDINAL {
            assert_eq!(Direction::from_delta(direction.to_delta()), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::from_delta(Position::new(1, 1)), Direction::None);
    }

    #[test]
    fn test_direction_between() {
        let from = Position::new(2, 2);
        assert_eq!(Direction::between(from, Position::new(3, 2)), Direction::Right);
        assert_eq!(Direction::between(from, Position::new(2, 1)), Direction::Up);
        assert_eq!(Direction::between(from, from), Direction::None);
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = new_entity_id();
        let id2 = new_entity_id();
        assert_ne!(id1, id2);
    }
}
