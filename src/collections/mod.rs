//! # Collections Module
//!
//! Hand-rolled generic containers shared by the maze and the search engine.
//!
//! - `DynamicArray`: growable, bounds-checked sequence
//! - `HashTable`: separate-chaining map with full rehash on growth
//! - `HashSet`: presence set over `HashTable`
//! - `BinaryHeap`: min-heap with arbitrary-element removal
//! - `LinkedStack`: singly linked LIFO stack
//!
//! All containers assume a single writer. Detached cursors detect structural
//! changes made behind their back through a modification counter and fail
//! with `MinotaurError::ConcurrentModification`.

pub mod binary_heap;
pub mod dynamic_array;
pub mod hash_set;
pub mod hash_table;
pub mod stack;

pub use binary_heap::*;
pub use dynamic_array::*;
pub use hash_set::*;
pub use hash_table::*;
pub use stack::*;
