use std::collections::HashSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::find::{PathFinder, SearchError, SearchState};
use crate::maze::{parse_maze, ParseError};

/// An integer cell coordinate on the grid, compared by value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step away in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight compass directions, y growing downwards.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }
}

use Direction::*;

/// Permitted directions per topological class, each subset keeping the
/// canonical N, NE, E, SE, S, SW, W, NW order. Indexed by
/// `row_class * 3 + col_class` where class 0 is the low edge, 1 the
/// interior and 2 the high edge.
const NEIGHBOR_TABLE: [&[Direction]; 9] = [
    // top-left corner
    &[East, SouthEast, South],
    // top edge
    &[East, SouthEast, South, SouthWest, West],
    // top-right corner
    &[South, SouthWest, West],
    // left edge
    &[North, NorthEast, East, SouthEast, South],
    // interior
    &[
        North, NorthEast, East, SouthEast, South, SouthWest, West, NorthWest,
    ],
    // right edge
    &[North, South, SouthWest, West, NorthWest],
    // bottom-left corner
    &[North, NorthEast, East],
    // bottom edge
    &[North, NorthEast, East, West, NorthWest],
    // bottom-right corner
    &[North, West, NorthWest],
];

/// Per-cell search bookkeeping. Topology (walls) and markers (start, end,
/// path) live on [`Grid`], not here.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub parent: Option<Position>,
    /// g: accumulated cost from the start along the best known path.
    pub movement_cost: i32,
    /// h: estimated remaining cost to the goal.
    pub heuristic_cost: i32,
    /// f = g + h.
    pub score: i32,
}

/// Derived display state of a cell, reconstructed on demand from the grid's
/// wall set, markers and path. Never stored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CellStatus {
    Wall,
    Start,
    End,
    Path,
    Default,
}

#[derive(Debug, Eq, PartialEq)]
pub enum GridError {
    /// The requested grid dimension was zero.
    ZeroDimension,
}

impl Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::ZeroDimension => write!(f, "grid dimension must be at least 1"),
        }
    }
}

impl std::error::Error for GridError {}

/// An N×N grid of cells with a wall set, start/end markers and the result of
/// the most recent search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    num_nodes: usize,
    grid_size: (u32, u32),
    cells: Vec<Vec<Cell>>,
    walls: HashSet<Position>,
    start: Option<Position>,
    end: Option<Position>,
    path: Vec<Position>,
    has_found_path: bool,
}

impl Grid {
    /// Create an open grid of `num_nodes` × `num_nodes` cells covering a
    /// board of `grid_size` units.
    pub fn new(num_nodes: usize, grid_size: (u32, u32)) -> Result<Self, GridError> {
        if num_nodes == 0 {
            return Err(GridError::ZeroDimension);
        }

        Ok(Self {
            num_nodes,
            grid_size,
            cells: vec![vec![Cell::default(); num_nodes]; num_nodes],
            walls: HashSet::new(),
            start: None,
            end: None,
            path: Vec::new(),
            has_found_path: false,
        })
    }

    /// Build a grid from a maze description; the dimension is `2M + 1` for a
    /// maze of side M (see [`parse_maze`]).
    pub fn from_maze(text: &str, grid_size: (u32, u32)) -> Result<Self, ParseError> {
        let (num_nodes, walls) = parse_maze(text)?;

        Ok(Self {
            num_nodes,
            grid_size,
            cells: vec![vec![Cell::default(); num_nodes]; num_nodes],
            walls,
            start: None,
            end: None,
            path: Vec::new(),
            has_found_path: false,
        })
    }

    pub fn dimension(&self) -> usize {
        self.num_nodes
    }

    /// Size of a single cell in board units (integer division).
    pub fn cell_size(&self) -> (u32, u32) {
        let n = self.num_nodes as u32;
        (self.grid_size.0 / n, self.grid_size.1 / n)
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn has_found_path(&self) -> bool {
        self.has_found_path
    }

    pub fn is_in_bounds(&self, position: Position) -> bool {
        let n = self.num_nodes as i32;
        position.x >= 0 && position.x < n && position.y >= 0 && position.y < n
    }

    pub fn is_wall(&self, position: Position) -> bool {
        self.walls.contains(&position)
    }

    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[position.x as usize][position.y as usize]
    }

    pub(crate) fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[position.x as usize][position.y as usize]
    }

    pub(crate) fn walls(&self) -> &HashSet<Position> {
        &self.walls
    }

    /// Place the start marker. Returns false without mutating when the
    /// position is out of bounds or on a wall.
    pub fn set_start(&mut self, position: Position) -> bool {
        if !self.is_in_bounds(position) || self.is_wall(position) {
            return false;
        }
        self.start = Some(position);
        true
    }

    /// Place the end marker. Same rejection rules as [`Grid::set_start`].
    pub fn set_end(&mut self, position: Position) -> bool {
        if !self.is_in_bounds(position) || self.is_wall(position) {
            return false;
        }
        self.end = Some(position);
        true
    }

    /// Insert a wall. No-op when out of bounds, on the start or end marker,
    /// or already present.
    pub fn add_wall(&mut self, position: Position) {
        if !self.is_in_bounds(position) {
            return;
        }
        if self.start == Some(position) || self.end == Some(position) {
            return;
        }
        self.walls.insert(position);
    }

    /// Remove a wall. No-op when not present.
    pub fn remove_wall(&mut self, position: Position) {
        self.walls.remove(&position);
    }

    /// Clear walls, the computed path and all cell bookkeeping. Dimension,
    /// board size and the start/end markers are kept; a full session reset
    /// is a fresh [`Grid::new`].
    pub fn reset(&mut self) {
        self.walls.clear();
        self.clear_search();
    }

    /// Forget the previous search so a new one starts from a clean sheet.
    pub(crate) fn clear_search(&mut self) {
        for column in &mut self.cells {
            for cell in column {
                *cell = Cell::default();
            }
        }
        self.path.clear();
        self.has_found_path = false;
    }

    /// Derived view of a cell for display purposes.
    pub fn cell_status(&self, position: Position) -> CellStatus {
        if self.start == Some(position) {
            CellStatus::Start
        } else if self.end == Some(position) {
            CellStatus::End
        } else if self.walls.contains(&position) {
            CellStatus::Wall
        } else if self.path.contains(&position) {
            CellStatus::Path
        } else {
            CellStatus::Default
        }
    }

    /// The in-bounds neighbors of a position in a fixed deterministic order,
    /// looked up from the per-class direction table. Walls are NOT filtered
    /// here; the search treats them as permanently closed instead.
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        let n = self.num_nodes as i32;

        let col_class = match position.x {
            0 => 0,
            x if x == n - 1 => 2,
            _ => 1,
        };
        let row_class = match position.y {
            0 => 0,
            y if y == n - 1 => 2,
            _ => 1,
        };

        let mut neighbors: Vec<Position> = NEIGHBOR_TABLE[row_class * 3 + col_class]
            .iter()
            .map(|&direction| position.step(direction))
            .collect();

        // a 1×1 grid is every class at once; the table alone is not enough
        neighbors.retain(|p| self.is_in_bounds(*p));

        neighbors
    }

    /// Run the A* search from start to end to completion. Fails when either
    /// marker is unset; an exhausted search is a normal
    /// [`SearchState::NoPathFound`] outcome, not an error.
    pub fn begin_search(&mut self) -> Result<SearchState, SearchError> {
        self.clear_search();

        let state = PathFinder::new(self)?.finish();

        if let SearchState::PathFound(result) = &state {
            self.path = result.path.clone();
            self.has_found_path = true;
        }

        Ok(state)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.num_nodes as i32 {
            for x in 0..self.num_nodes as i32 {
                let c = match self.cell_status(Position::new(x, y)) {
                    CellStatus::Wall => '#',
                    CellStatus::Start => 'S',
                    CellStatus::End => 'E',
                    CellStatus::Path => '*',
                    CellStatus::Default => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
