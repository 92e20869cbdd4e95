//! # Maze
//!
//! The cell grid plus a live spatial index from position to the entities
//! standing there.
//!
//! Entities are tracked by id. The index is kept in sync explicitly: whoever
//! moves an entity calls [`Maze::move_entity`] (or [`Maze::relocate`] with the
//! old and new positions), which removes the id from the old bucket before
//! inserting it into the new one.

use crate::collections::{DynamicArray, HashTable};
use crate::{Entity, EntityId, MinotaurError, MinotaurResult, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of maze cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Solid, never passable. Also what every unset cell becomes.
    #[default]
    Wall,
    /// Open ground.
    Floor,
}

impl Cell {
    /// Returns true if entities can stand on this cell.
    pub fn is_passable(self) -> bool {
        matches!(self, Cell::Floor)
    }

    /// Single-character text form: `#` for walls, `.` for floor.
    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => '.',
        }
    }

    /// Parses a text symbol. Unknown symbols are treated as unset.
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Floor),
            _ => None,
        }
    }
}

/// Fixed-size cell grid with a position → entity index.
///
/// # Examples
///
/// ```
/// use minotaur::{Cell, Entity, EntityKind, Maze, MazeEntity, Position};
///
/// let mut maze = Maze::from_ascii("...\n.#.\n...");
/// assert_eq!(maze.get(1, 1).unwrap(), Cell::Wall);
///
/// let mut runner = MazeEntity::new(EntityKind::Runner, Position::new(0, 0));
/// maze.add_entity(&runner).unwrap();
/// maze.move_entity(&mut runner, Position::new(1, 0)).unwrap();
///
/// assert!(maze.entities_at(0, 0).is_empty());
/// assert_eq!(maze.entities_at(1, 0), vec![runner.id()]);
/// ```
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    occupants: HashTable<Position, DynamicArray<EntityId>>,
    locations: HashTable<EntityId, Position>,
}

struct NormalizedLayout {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Flattens rows into a dense grid. Unset cells and the padding of short
/// rows become walls.
fn normalize_layout<R>(rows: &[R]) -> NormalizedLayout
where
    R: AsRef<[Option<Cell>]>,
{
    let height = rows.len();
    let width = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
    let mut cells = Vec::with_capacity(width * height);
    for row in rows {
        let row = row.as_ref();
        cells.extend((0..width).map(|x| row.get(x).copied().flatten().unwrap_or_default()));
    }
    NormalizedLayout {
        width,
        height,
        cells,
    }
}

impl Maze {
    /// Creates a `width` × `height` maze filled with walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_normalized(NormalizedLayout {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        })
    }

    /// Creates a maze from rows of optional cells (`layout[y][x]`).
    ///
    /// Any `None` cell becomes a wall, and short rows are padded with walls
    /// to the length of the longest row.
    pub fn from_layout<R>(layout: &[R]) -> Self
    where
        R: AsRef<[Option<Cell>]>,
    {
        Self::from_normalized(normalize_layout(layout))
    }

    /// Creates a maze from fully specified rows (`rows[y][x]`).
    pub fn from_cells(rows: &[Vec<Cell>]) -> Self {
        let layout: Vec<Vec<Option<Cell>>> = rows
            .iter()
            .map(|row| row.iter().copied().map(Some).collect())
            .collect();
        Self::from_layout(&layout)
    }

    /// Parses a text grid, one line per row, `#` for walls and `.` for floor.
    /// Any other character is an unset cell and becomes a wall.
    pub fn from_ascii(text: &str) -> Self {
        let layout: Vec<Vec<Option<Cell>>> = text
            .lines()
            .map(|line| line.chars().map(Cell::from_symbol).collect())
            .collect();
        Self::from_layout(&layout)
    }

    fn from_normalized(layout: NormalizedLayout) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            cells: layout.cells,
            occupants: HashTable::new(),
            locations: HashTable::new(),
        }
    }

    /// Replaces the whole layout, normalising unset cells to walls.
    ///
    /// Registered entities keep their positions, so a layout that would
    /// leave any of them outside the grid is rejected and nothing changes.
    pub fn set_layout<R>(&mut self, layout: &[R]) -> MinotaurResult<()>
    where
        R: AsRef<[Option<Cell>]>,
    {
        let normalized = normalize_layout(layout);
        for (_, position) in self.locations.iter() {
            if !within(*position, normalized.width, normalized.height) {
                return Err(MinotaurError::PositionOutOfBounds {
                    x: position.x,
                    y: position.y,
                    width: normalized.width,
                    height: normalized.height,
                });
            }
        }
        self.width = normalized.width;
        self.height = normalized.height;
        self.cells = normalized.cells;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if `position` lies inside the grid.
    pub fn in_bounds(&self, position: Position) -> bool {
        within(position, self.width, self.height)
    }

    /// Returns the cell at (`x`, `y`).
    pub fn get(&self, x: i32, y: i32) -> MinotaurResult<Cell> {
        let index = self.index_of(x, y)?;
        Ok(self.cells[index])
    }

    /// Overwrites the cell at (`x`, `y`).
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> MinotaurResult<()> {
        let index = self.index_of(x, y)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Returns the cell at `position`, or `None` outside the grid.
    pub fn cell_at(&self, position: Position) -> Option<Cell> {
        self.get(position.x, position.y).ok()
    }

    /// Whether the static layout allows standing on `position`.
    /// Always false outside the grid.
    pub fn is_passable(&self, position: Position) -> bool {
        self.cell_at(position).is_some_and(Cell::is_passable)
    }

    /// Passable and not occupied by any entity.
    pub fn is_free(&self, position: Position) -> bool {
        self.is_passable(position) && !self.is_occupied(position)
    }

    /// Copy of the grid as rows (`layout[y][x]`).
    pub fn layout(&self) -> Vec<Vec<Cell>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells.chunks(self.width).map(<[Cell]>::to_vec).collect()
    }

    /// All floor positions in row-major order.
    pub fn floor_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|position| self.is_passable(*position))
            .collect()
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }

    fn index_of(&self, x: i32, y: i32) -> MinotaurResult<usize> {
        if !self.in_bounds(Position::new(x, y)) {
            return Err(MinotaurError::PositionOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    fn check_bounds(&self, position: Position) -> MinotaurResult<()> {
        self.index_of(position.x, position.y).map(|_| ())
    }

    /// Registers `entity` at its current position.
    pub fn add_entity<E: Entity + ?Sized>(&mut self, entity: &E) -> MinotaurResult<()> {
        let id = entity.id();
        let position = entity.position();
        if self.locations.contains_key(&id) {
            return Err(MinotaurError::EntityAlreadyPresent(id));
        }
        self.check_bounds(position)?;

        self.insert_occupant(id, position)?;
        self.locations.put(id, position);
        log::trace!("entity {} added at {}", id, position);
        Ok(())
    }

    /// Moves the index entry for `id` from `old` to `new`.
    ///
    /// Call exactly once per logical move. Everything is validated before the
    /// index is touched: the entity must be registered, recorded at `old`,
    /// and `new` must be inside the grid. The id is removed from `old`'s
    /// bucket before it is added to `new`'s.
    pub fn relocate(&mut self, id: EntityId, old: Position, new: Position) -> MinotaurResult<()> {
        let recorded = *self
            .locations
            .get(&id)
            .ok_or(MinotaurError::EntityNotFound(id))?;
        if recorded != old {
            return Err(MinotaurError::PositionMismatch {
                id,
                expected: old,
                actual: recorded,
            });
        }
        self.check_bounds(new)?;
        if old == new {
            return Ok(());
        }

        self.remove_occupant(id, old);
        if let Err(err) = self.insert_occupant(id, new) {
            self.insert_occupant(id, old)?;
            return Err(err);
        }
        self.locations.put(id, new);
        log::trace!("entity {} moved {} -> {}", id, old, new);
        Ok(())
    }

    /// Moves a registered entity to `new`, updating both the index and the
    /// entity. This is the position-change entry point for callers.
    pub fn move_entity<E: Entity + ?Sized>(
        &mut self,
        entity: &mut E,
        new: Position,
    ) -> MinotaurResult<()> {
        self.relocate(entity.id(), entity.position(), new)?;
        entity.set_position(new);
        Ok(())
    }

    /// Deregisters `id`, returning the position it was recorded at.
    pub fn remove_entity(&mut self, id: EntityId) -> MinotaurResult<Position> {
        let position = self
            .locations
            .remove(&id)
            .ok_or(MinotaurError::EntityNotFound(id))?;
        self.remove_occupant(id, position);
        log::trace!("entity {} removed from {}", id, position);
        Ok(position)
    }

    /// Replaces every registration with `entities`.
    ///
    /// The new set is validated first (in bounds, no duplicate ids); on error
    /// the current registrations are left untouched.
    pub fn set_entities<'a, E, I>(&mut self, entities: I) -> MinotaurResult<()>
    where
        E: Entity + ?Sized + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut staged: HashTable<EntityId, Position> = HashTable::new();
        for entity in entities {
            let id = entity.id();
            self.check_bounds(entity.position())?;
            if staged.put(id, entity.position()).is_some() {
                return Err(MinotaurError::EntityAlreadyPresent(id));
            }
        }

        self.occupants.clear();
        self.locations.clear();
        for (id, position) in staged.iter() {
            self.insert_occupant(*id, *position)?;
            self.locations.put(*id, *position);
        }
        Ok(())
    }

    /// Snapshot of the ids at (`x`, `y`), in arrival order. Empty when the
    /// cell is vacant or outside the grid.
    pub fn entities_at(&self, x: i32, y: i32) -> Vec<EntityId> {
        self.entities_at_position(Position::new(x, y))
    }

    /// Snapshot of the ids at `position`, in arrival order.
    pub fn entities_at_position(&self, position: Position) -> Vec<EntityId> {
        self.occupants
            .get(&position)
            .map(DynamicArray::to_vec)
            .unwrap_or_default()
    }

    /// Whether any entity stands on `position`.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupants.contains_key(&position)
    }

    /// Ids of every registered entity, in no particular order.
    pub fn entities(&self) -> Vec<EntityId> {
        self.locations.keys().copied().collect()
    }

    pub fn entity_position(&self, id: EntityId) -> Option<Position> {
        self.locations.get(&id).copied()
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.locations.contains_key(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.locations.len()
    }

    fn insert_occupant(&mut self, id: EntityId, position: Position) -> MinotaurResult<()> {
        match self.occupants.get_mut(&position) {
            Some(bucket) => bucket.add(id)?,
            None => {
                let mut bucket = DynamicArray::with_capacity(2);
                bucket.add(id)?;
                self.occupants.put(position, bucket);
            }
        }
        Ok(())
    }

    fn remove_occupant(&mut self, id: EntityId, position: Position) {
        if let Some(bucket) = self.occupants.get_mut(&position) {
            bucket.remove_item(&id);
            if bucket.is_empty() {
                self.occupants.remove(&position);
            }
        }
    }
}

fn within(position: Position, width: usize, height: usize) -> bool {
    position.x >= 0
        && position.y >= 0
        && (position.x as usize) < width
        && (position.y as usize) < height
}

impl fmt::Display for Maze {
    /// Draws walls as `#`, floor as `.` and occupied cells as `@`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let position = Position::new(x as i32, y as i32);
                let symbol = if self.is_occupied(position) {
                    '@'
                } else {
                    self.cells[y * self.width + x].symbol()
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
