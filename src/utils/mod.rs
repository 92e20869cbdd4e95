//! # Utilities Module
//!
//! Search utilities shared by the runners and the binary.

pub mod pathfinding;

pub use pathfinding::*;
