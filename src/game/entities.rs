//! # Entities
//!
//! Things that occupy maze cells. The maze never owns entities; it only
//! records which id sits where, so whoever moves an entity must also tell
//! the maze (see [`Maze::move_entity`](crate::Maze::move_entity)).

use crate::{new_entity_id, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Anything with a stable identity and a position in the maze.
pub trait Entity {
    /// Stable identity, unchanged for the entity's lifetime.
    fn id(&self) -> EntityId;

    /// Current position.
    fn position(&self) -> Position;

    /// Overwrites the position. Does not update any maze index; use
    /// [`Maze::move_entity`](crate::Maze::move_entity) for registered entities.
    fn set_position(&mut self, position: Position);
}

/// Role of a plain maze entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Something that moves toward goals
    Runner,
    /// Something runners move toward
    Goal,
    /// Something that blocks a cell without being a wall
    Obstacle,
}

/// Plain entity: an id, a position and a role.
///
/// # Examples
///
/// ```
/// use minotaur::{Entity, EntityKind, MazeEntity, Position};
///
/// let goal = MazeEntity::new(EntityKind::Goal, Position::new(3, 4));
/// assert_eq!(goal.position(), Position::new(3, 4));
/// assert!(goal.is_goal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeEntity {
    id: EntityId,
    pub kind: EntityKind,
    position: Position,
}

impl MazeEntity {
    /// Creates an entity with a fresh id.
    pub fn new(kind: EntityKind, position: Position) -> Self {
        Self::with_id(new_entity_id(), kind, position)
    }

    /// Creates an entity with a caller-chosen id.
    pub fn with_id(id: EntityId, kind: EntityKind, position: Position) -> Self {
        Self { id, kind, position }
    }

    pub fn is_goal(&self) -> bool {
        self.kind == EntityKind::Goal
    }
}

impl Entity for MazeEntity {
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

/// Positions of a set of entities, as a goal snapshot for one search.
pub fn positions_of<'a, E, I>(entities: I) -> Vec<Position>
where
    E: Entity + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entities.into_iter().map(Entity::position).collect()
}
