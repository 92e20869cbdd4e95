//! # Pathfinding
//!
//! A* search over the 4-connected grid, answering "which way is my next step
//! toward the nearest goal".
//!
//! Every call builds its own open heap, closed set and g-cost table and drops
//! them on return; nothing is cached between ticks. The goal slice is
//! borrowed for the whole call, so the goal set cannot change mid-search.

use crate::collections::{BinaryHeap, HashSet, HashTable};
use crate::{Direction, MinotaurResult, Position};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// Tuning knobs for a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Upper bound on expanded nodes. A search that would exceed it gives up
    /// and reports no route. `None` searches until the open set is empty.
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    /// Parses a JSON configuration. Fields it does not know are ignored, so
    /// the search settings can share a file with a generation config.
    pub fn from_json_str(json: &str) -> MinotaurResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MinotaurResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Predecessor tree node. Parents are indices into the per-search arena.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    position: Position,
    parent: Option<usize>,
}

/// Open set entry.
///
/// Equality is by position only, so a key holding just the position finds the
/// stale entry to replace when a cheaper route turns up.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    position: Position,
    g_cost: u32,
    f_score: u32,
    node: usize,
}

impl OpenNode {
    fn key(position: Position) -> Self {
        Self {
            position,
            g_cost: 0,
            f_score: 0,
            node: 0,
        }
    }

    /// Lowest f first; among equal f prefer the deeper node.
    fn by_f_score(a: &OpenNode, b: &OpenNode) -> Ordering {
        a.f_score
            .cmp(&b.f_score)
            .then_with(|| b.g_cost.cmp(&a.g_cost))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

/// Manhattan distance from `position` to the closest of `goals`.
///
/// Returns `None` when `goals` is empty.
pub fn nearest_goal_distance(position: Position, goals: &[Position]) -> Option<u32> {
    goals
        .iter()
        .map(|goal| position.manhattan_distance(*goal))
        .min()
}

/// A* search engine with a fixed configuration.
///
/// # Examples
///
/// ```
/// use minotaur::{Direction, Pathfinder, Position};
///
/// let pathfinder = Pathfinder::default();
/// let goals = [Position::new(3, 0)];
/// let step = pathfinder
///     .next_step(Position::new(0, 0), &goals, |p| p.y == 0 && (0..4).contains(&p.x))
///     .unwrap();
/// assert_eq!(step, Direction::Right);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Pathfinder {
    config: SearchConfig,
}

impl Pathfinder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Direction of the first step on a shortest route from `start` to the
    /// nearest reachable goal.
    ///
    /// Returns `Direction::None` when `goals` is empty, when `start` already
    /// is a goal, when no goal is reachable, or when the expansion budget runs
    /// out. Errors only if a search container saturates.
    pub fn next_step<F>(
        &self,
        start: Position,
        goals: &[Position],
        passable: F,
    ) -> MinotaurResult<Direction>
    where
        F: Fn(Position) -> bool,
    {
        let direction = match self.find_path(start, goals, passable)? {
            Some(path) => path
                .first()
                .map_or(Direction::None, |next| Direction::between(start, *next)),
            None => Direction::None,
        };
        Ok(direction)
    }

    /// Shortest route from `start` to the nearest reachable goal.
    ///
    /// The returned positions exclude `start` and end on a goal; the path is
    /// empty when `start` is itself a goal. `None` means no route was found.
    pub fn find_path<F>(
        &self,
        start: Position,
        goals: &[Position],
        passable: F,
    ) -> MinotaurResult<Option<Vec<Position>>>
    where
        F: Fn(Position) -> bool,
    {
        if goals.is_empty() {
            debug!("no goals to search for from {}", start);
            return Ok(None);
        }
        let heuristic = |position: Position| nearest_goal_distance(position, goals).unwrap_or(0);

        let mut arena = vec![SearchNode {
            position: start,
            parent: None,
        }];
        let mut open: BinaryHeap<OpenNode, _> = BinaryHeap::with_comparator(OpenNode::by_f_score);
        let mut closed: HashSet<Position> = HashSet::new();
        let mut g_costs: HashTable<Position, u32> = HashTable::new();

        g_costs.put(start, 0);
        open.add(OpenNode {
            position: start,
            g_cost: 0,
            f_score: heuristic(start),
            node: 0,
        })?;

        let mut expanded = 0usize;
        while let Some(current) = open.extract_min() {
            if heuristic(current.position) == 0 {
                let path = reconstruct_path(&arena, current.node);
                debug!(
                    "route {} -> {} found: {} steps, {} nodes expanded",
                    start,
                    current.position,
                    path.len(),
                    expanded
                );
                return Ok(Some(path));
            }

            if let Some(limit) = self.config.max_expansions {
                if expanded >= limit {
                    warn!(
                        "search from {} gave up after {} expansions",
                        start, expanded
                    );
                    return Ok(None);
                }
            }
            expanded += 1;
            closed.add(current.position);

            for neighbour in current.position.cardinal_neighbours() {
                if !passable(neighbour) || closed.contains(&neighbour) {
                    continue;
                }

                let tentative = current.g_cost.saturating_add(1);
                if let Some(&known) = g_costs.get(&neighbour) {
                    if known <= tentative {
                        continue;
                    }
                    open.remove(&OpenNode::key(neighbour));
                }

                g_costs.put(neighbour, tentative);
                arena.push(SearchNode {
                    position: neighbour,
                    parent: Some(current.node),
                });
                open.add(OpenNode {
                    position: neighbour,
                    g_cost: tentative,
                    f_score: tentative.saturating_add(heuristic(neighbour)),
                    node: arena.len() - 1,
                })?;
            }
        }

        debug!("no route from {} after {} expansions", start, expanded);
        Ok(None)
    }
}

/// Walks predecessor links back to the root. The root itself is left out.
fn reconstruct_path(arena: &[SearchNode], mut node: usize) -> Vec<Position> {
    let mut path = Vec::new();
    while let Some(parent) = arena[node].parent {
        path.push(arena[node].position);
        node = parent;
    }
    path.reverse();
    path
}

/// [`Pathfinder::next_step`] with the default configuration.
pub fn next_step<F>(start: Position, goals: &[Position], passable: F) -> MinotaurResult<Direction>
where
    F: Fn(Position) -> bool,
{
    Pathfinder::default().next_step(start, goals, passable)
}

/// [`Pathfinder::find_path`] with the default configuration.
pub fn find_path<F>(
    start: Position,
    goals: &[Position],
    passable: F,
) -> MinotaurResult<Option<Vec<Position>>>
where
    F: Fn(Position) -> bool,
{
    Pathfinder::default().find_path(start, goals, passable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Maze;

    fn open_grid(width: i32, height: i32) -> impl Fn(Position) -> bool {
        move |p| p.x >= 0 && p.y >= 0 && p.x < width && p.y < height
    }

    #[test]
    fn test_open_grid_first_step() {
        let step = next_step(Position::new(0, 0), &[Position::new(4, 4)], open_grid(5, 5)).unwrap();
        assert!(step == Direction::Right || step == Direction::Down);
    }

    #[test]
    fn test_path_length_is_manhattan_on_open_grid() {
        let path = find_path(Position::new(0, 0), &[Position::new(4, 4)], open_grid(5, 5))
            .unwrap()
            .expect("route exists");
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&Position::new(4, 4)));
    }

    #[test]
    fn test_enclosed_start_has_no_route() {
        let start = Position::new(2, 2);
        let passable = |p: Position| p == start || p.manhattan_distance(start) > 1;
        let step = next_step(start, &[Position::new(0, 0)], passable).unwrap();
        assert_eq!(step, Direction::None);
    }

    #[test]
    fn test_empty_goals_and_start_on_goal() {
        let start = Position::new(1, 1);
        assert_eq!(next_step(start, &[], open_grid(3, 3)).unwrap(), Direction::None);
        assert_eq!(next_step(start, &[start], open_grid(3, 3)).unwrap(), Direction::None);
        assert_eq!(find_path(start, &[start], open_grid(3, 3)).unwrap(), Some(vec![]));
    }

    #[test]
    fn test_search_at_coordinate_edge() {
        let start = Position::new(i32::MAX, 0);
        let goal = Position::new(i32::MAX - 3, 0);
        assert_eq!(next_step(start, &[goal], |_| true).unwrap(), Direction::Left);
        let path = find_path(start, &[goal], |_| true)
            .unwrap()
            .expect("route exists");
        assert_eq!(path.len(), 3);

        let corner = Position::new(i32::MIN, i32::MIN);
        let far = Position::new(i32::MAX, i32::MAX);
        let budget = Pathfinder::new(SearchConfig {
            max_expansions: Some(50),
        });
        assert_eq!(budget.next_step(corner, &[far], |_| true).unwrap(), Direction::None);
    }

    #[test]
    fn test_routes_around_walls() {
        let maze = Maze::from_ascii(
            "\
.....
####.
.....
.####
.....",
        );
        let path = find_path(Position::new(0, 0), &[Position::new(4, 4)], |p| {
            maze.is_passable(p)
        })
        .unwrap()
        .expect("serpentine route exists");
        assert_eq!(path.len(), 16);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
            assert!(maze.is_passable(pair[1]));
        }
    }

    #[test]
    fn test_prefers_nearest_goal() {
        let goals = [Position::new(0, 4), Position::new(4, 0)];
        let path = find_path(Position::new(3, 0), &goals, open_grid(5, 5))
            .unwrap()
            .expect("route exists");
        assert_eq!(path, vec![Position::new(4, 0)]);
        assert_eq!(
            next_step(Position::new(3, 0), &goals, open_grid(5, 5)).unwrap(),
            Direction::Right
        );
    }

    #[test]
    fn test_expansion_budget() {
        let start = Position::new(0, 0);
        let goals = [Position::new(9, 9)];
        let tight = Pathfinder::new(SearchConfig {
            max_expansions: Some(3),
        });
        assert_eq!(tight.next_step(start, &goals, open_grid(10, 10)).unwrap(), Direction::None);

        let roomy = Pathfinder::new(SearchConfig {
            max_expansions: Some(10_000),
        });
        assert_ne!(roomy.next_step(start, &goals, open_grid(10, 10)).unwrap(), Direction::None);
    }

    #[test]
    fn test_routes_over_pillars() {
        let maze = Maze::from_ascii(
            "\
.....
.#.#.
.....",
        );
        let path = find_path(Position::new(0, 1), &[Position::new(4, 1)], |p| {
            maze.is_passable(p)
        })
        .unwrap()
        .expect("route exists");
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_nearest_goal_distance() {
        let goals = [Position::new(5, 5), Position::new(1, 0)];
        assert_eq!(nearest_goal_distance(Position::origin(), &goals), Some(1));
        assert_eq!(nearest_goal_distance(Position::origin(), &[]), None);
    }
}
