//! # Depth-First Maze Generator
//!
//! Recursive backtracker on a lattice of rooms. Room (cx, cy) sits at grid
//! position (2cx + 1, 2cy + 1); the cells between two rooms are walls until
//! the walk carves through them. The walk runs on an explicit stack, so
//! large mazes never recurse.

use super::{GenerationConfig, MazeGenerator};
use crate::collections::LinkedStack;
use crate::{Cell, Maze, MinotaurResult, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Generates corridor mazes in which every floor cell is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsMazeGenerator;

impl DfsMazeGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Room lattice dimensions for a grid of `width` × `height`.
fn lattice_size(width: usize, height: usize) -> (usize, usize) {
    (width.saturating_sub(1) / 2, height.saturating_sub(1) / 2)
}

fn room_to_grid(room: (usize, usize)) -> Position {
    Position::new((room.0 * 2 + 1) as i32, (room.1 * 2 + 1) as i32)
}

/// Returns true if the wall at (`x`, `y`) sits between two rooms, so that
/// removing it joins two corridors instead of opening an isolated pocket.
fn separates_rooms(x: usize, y: usize, rooms_wide: usize, rooms_high: usize) -> bool {
    let last_x = rooms_wide * 2 - 1;
    let last_y = rooms_high * 2 - 1;
    let horizontal = x % 2 == 0 && y % 2 == 1 && x >= 2 && x <= last_x - 1 && y <= last_y;
    let vertical = y % 2 == 0 && x % 2 == 1 && y >= 2 && y <= last_y - 1 && x <= last_x;
    horizontal || vertical
}

impl MazeGenerator for DfsMazeGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> MinotaurResult<Maze> {
        let mut maze = Maze::new(config.width, config.height);
        let (rooms_wide, rooms_high) = lattice_size(config.width, config.height);
        if rooms_wide == 0 || rooms_high == 0 {
            return Ok(maze);
        }

        let mut visited = vec![false; rooms_wide * rooms_high];
        let mut stack = LinkedStack::new();
        let start = (0, 0);
        visited[0] = true;
        let origin = room_to_grid(start);
        maze.set(origin.x, origin.y, Cell::Floor)?;
        stack.push(start);

        while let Some(&(cx, cy)) = stack.peek() {
            let mut unvisited = Vec::with_capacity(4);
            if cx > 0 {
                unvisited.push((cx - 1, cy));
            }
            if cx + 1 < rooms_wide {
                unvisited.push((cx + 1, cy));
            }
            if cy > 0 {
                unvisited.push((cx, cy - 1));
            }
            if cy + 1 < rooms_high {
                unvisited.push((cx, cy + 1));
            }
            unvisited.retain(|&(nx, ny)| !visited[ny * rooms_wide + nx]);

            let Some(&next) = unvisited.choose(rng) else {
                stack.pop();
                continue;
            };

            visited[next.1 * rooms_wide + next.0] = true;
            let from = room_to_grid((cx, cy));
            let to = room_to_grid(next);
            maze.set((from.x + to.x) / 2, (from.y + to.y) / 2, Cell::Floor)?;
            maze.set(to.x, to.y, Cell::Floor)?;
            stack.push(next);
        }

        if config.loop_chance > 0.0 {
            let mut opened = 0usize;
            for y in 1..config.height - 1 {
                for x in 1..config.width - 1 {
                    if !separates_rooms(x, y, rooms_wide, rooms_high) {
                        continue;
                    }
                    let (gx, gy) = (x as i32, y as i32);
                    if maze.get(gx, gy)? == Cell::Wall && rng.gen_bool(config.loop_chance) {
                        maze.set(gx, gy, Cell::Floor)?;
                        opened += 1;
                    }
                }
            }
            log::debug!("opened {} extra passages", opened);
        }

        Ok(maze)
    }

    fn generator_type(&self) -> &'static str {
        "dfs"
    }
}
