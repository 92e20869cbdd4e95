//! # Minotaur
//!
//! The simulation core of a grid maze game: runners chase goals through
//! generated mazes, one step per tick.
//!
//! ## Architecture Overview
//!
//! The crate is layered leaf-first:
//!
//! - **Collections**: hand-rolled containers (`DynamicArray`, `HashTable`,
//!   `HashSet`, `BinaryHeap`, `LinkedStack`) with fail-fast cursors
//! - **Maze**: the cell grid plus a live spatial index of entity positions
//! - **Pathfinding**: an A* engine answering "which way is my next step"
//! - **Generation**: pluggable maze generators
//! - **Runners**: entities that decide their own moves
//!
//! Everything runs on a single thread. Search state is rebuilt for every
//! `next_step` call and never cached between ticks.

pub mod collections;
pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use collections::*;
pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the Minotaur engine.
#[derive(thiserror::Error, Debug)]
pub enum MinotaurError {
    /// Indexed container access outside `[0, len)`
    #[error("Index out of bounds: {index} (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Grid access outside the maze
    #[error("Position out of bounds: ({x}, {y}) in a {width}x{height} maze")]
    PositionOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// A cursor observed a structural change it did not make
    #[error("Container was structurally modified during iteration")]
    ConcurrentModification,

    /// Cursor removal without a current element
    #[error("Cursor has no current element")]
    NoCurrentElement,

    /// Container cannot grow any further
    #[error("Container capacity saturated at {capacity}")]
    CapacitySaturated { capacity: usize },

    /// Entity is not registered with the maze
    #[error("Entity not found: {0}")]
    EntityNotFound(game::EntityId),

    /// Entity is already registered with the maze
    #[error("Entity already present: {0}")]
    EntityAlreadyPresent(game::EntityId),

    /// Relocation named a position the entity is not recorded at
    #[error("Entity {id} is at {actual}, not {expected}")]
    PositionMismatch {
        id: game::EntityId,
        expected: game::Position,
        actual: game::Position,
    },

    /// Configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type used throughout the Minotaur codebase.
pub type MinotaurResult<T> = Result<T, MinotaurError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default maze width in cells
    pub const DEFAULT_MAZE_WIDTH: usize = 50;

    /// Default maze height in cells
    pub const DEFAULT_MAZE_HEIGHT: usize = 50;

    /// Initial slot count of a `DynamicArray`
    pub const ARRAY_INITIAL_CAPACITY: usize = 16;

    /// Largest slot count a `DynamicArray` (and so a `BinaryHeap`) may reach
    pub const ARRAY_MAX_CAPACITY: usize = i32::MAX as usize - 8;

    /// Initial bucket count of a `HashTable`
    pub const TABLE_INITIAL_CAPACITY: usize = 16;

    /// Largest bucket count a `HashTable` may reach
    pub const TABLE_MAX_CAPACITY: usize = 1 << 30;

    /// Fill ratio above which a `HashTable` doubles
    pub const TABLE_LOAD_FACTOR: f64 = 0.75;

    /// Default number of moves the demo binary simulates
    pub const DEFAULT_MAX_STEPS: usize = 10_000;
}
