//! Grid pathfinding core: an N×N cell grid with walls, a maze-description
//! parser, and an A* search with deterministic tie-breaking. Rendering and
//! input handling live outside this crate; UI layers consume the
//! [`Grid::cell_status`] view only.

pub mod find;
pub mod grid;
pub mod maze;

pub use find::{PathFinder, PathResult, SearchError, SearchState};
pub use grid::{Cell, CellStatus, Direction, Grid, GridError, Position};
pub use maze::{parse_maze, ParseError};
