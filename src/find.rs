//! A* search over a [`Grid`].
//!
//! The open set is a plain vec scanned linearly for the lowest f score; on
//! ties the first position encountered wins. That tie-break is part of the
//! contract (searches must be reproducible), which rules out a binary heap
//! whose ordering among equal scores is unspecified.

use std::collections::HashSet;
use std::fmt::Display;

use log::{debug, info};

use crate::grid::{Grid, Position};

pub const HORIZONTAL_COST: i32 = 10;
pub const VERTICAL_COST: i32 = 10;
pub const DIAGONAL_COST: i32 = 14;

/// Cost of a single step between adjacent positions. Straight steps cost
/// 10 per axis, a diagonal step costs 14.
pub fn movement_cost(from: Position, to: Position) -> i32 {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();

    if dx == 1 && dy == 1 {
        DIAGONAL_COST
    } else {
        HORIZONTAL_COST * dx + VERTICAL_COST * dy
    }
}

/// Manhattan distance. Admissible under the 10/14 step costs: it never
/// overestimates the remaining cost.
pub fn heuristic_cost(from: Position, to: Position) -> i32 {
    (to.x - from.x).abs() + (to.y - from.y).abs()
}

#[derive(Debug, Eq, PartialEq)]
pub enum SearchError {
    /// `begin_search` was invoked before both start and end were set.
    NotConfigured,
}

impl Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::NotConfigured => {
                write!(f, "search requires both a start and an end position")
            }
        }
    }
}

impl std::error::Error for SearchError {}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PathResult {
    /// Ordered start → end, both inclusive.
    pub path: Vec<Position>,
    pub start: Position,
    pub goal: Position,
    pub total_cost: i32,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SearchState {
    Computing,
    /// The open set was exhausted without reaching the goal. A normal
    /// outcome, not an error.
    NoPathFound,
    PathFound(PathResult),
}

impl SearchState {
    fn is_done(&self) -> bool {
        !matches!(self, SearchState::Computing)
    }
}

/// Drives one A* search over a grid, writing parent/cost bookkeeping into
/// the grid's cells as it goes.
#[derive(Debug)]
pub struct PathFinder<'a> {
    grid: &'a mut Grid,
    start: Position,
    goal: Position,
    open: Vec<Position>,
    closed: HashSet<Position>,
    state: SearchState,
}

impl<'a> PathFinder<'a> {
    /// Set up a search from the grid's start to its end marker. Walls seed
    /// the closed set, so the neighbor loop never needs to special-case
    /// them.
    pub fn new(grid: &'a mut Grid) -> Result<Self, SearchError> {
        let (start, goal) = match (grid.start(), grid.end()) {
            (Some(start), Some(goal)) => (start, goal),
            _ => return Err(SearchError::NotConfigured),
        };

        let closed = grid.walls().clone();

        let start_cell = grid.cell_mut(start);
        start_cell.parent = None;
        start_cell.movement_cost = 0;
        start_cell.heuristic_cost = heuristic_cost(start, goal);
        start_cell.score = start_cell.movement_cost + start_cell.heuristic_cost;

        debug!("searching {} -> {}", start, goal);

        Ok(Self {
            grid,
            start,
            goal,
            open: vec![start],
            closed,
            state: SearchState::Computing,
        })
    }

    /// Run the search to completion.
    pub fn finish(mut self) -> SearchState {
        loop {
            match self.step() {
                SearchState::Computing => {}
                state => return state,
            }
        }
    }

    /// Expand the single lowest-scored open position.
    pub fn step(&mut self) -> SearchState {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(index) = self.lowest_scored() else {
            info!("open set exhausted, no path");
            self.state = SearchState::NoPathFound;
            return self.state.clone();
        };
        let current = self.open[index];

        if current == self.goal {
            let path = self.build_path();
            let total_cost = self.grid.cell(self.goal).movement_cost;
            info!("found path of {} positions, cost {}", path.len(), total_cost);
            self.state = SearchState::PathFound(PathResult {
                path,
                start: self.start,
                goal: self.goal,
                total_cost,
            });
            return self.state.clone();
        }

        // plain remove keeps the open set's insertion order intact for the
        // first-wins tie-break
        self.open.remove(index);
        self.closed.insert(current);

        for neighbor in self.grid.neighbors(current) {
            if self.closed.contains(&neighbor) {
                continue;
            }

            let tentative_cost =
                self.grid.cell(current).movement_cost + movement_cost(current, neighbor);

            let in_open = self.open.contains(&neighbor);
            if !in_open || tentative_cost < self.grid.cell(neighbor).movement_cost {
                let heuristic = heuristic_cost(neighbor, self.goal);
                let cell = self.grid.cell_mut(neighbor);
                cell.parent = Some(current);
                cell.movement_cost = tentative_cost;
                cell.heuristic_cost = heuristic;
                cell.score = tentative_cost + heuristic;

                if !in_open {
                    self.open.push(neighbor);
                }
            }
        }

        self.state.clone()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Index of the open position with the lowest f score; strict comparison
    /// keeps the earliest position on ties.
    fn lowest_scored(&self) -> Option<usize> {
        let mut lowest: Option<usize> = None;

        for (index, &position) in self.open.iter().enumerate() {
            match lowest {
                Some(best) if self.grid.cell(position).score >= self.grid.cell(self.open[best]).score => {}
                _ => lowest = Some(index),
            }
        }

        lowest
    }

    /// Walk the parent links back from the goal, then reverse. Iterative on
    /// purpose: a path can span the whole grid.
    fn build_path(&self) -> Vec<Position> {
        let mut path = vec![self.goal];
        let mut current = self.goal;

        while let Some(parent) = self.grid.cell(current).parent {
            path.push(parent);
            current = parent;
        }

        path.reverse();
        path
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Grid;

    fn open_grid(n: usize) -> Grid {
        Grid::new(n, (100 * n as u32, 100 * n as u32)).unwrap()
    }

    #[test]
    fn search_without_markers_fails_fast() {
        let mut grid = open_grid(3);
        assert_eq!(grid.begin_search().unwrap_err(), SearchError::NotConfigured);

        grid.set_start(Position::new(0, 0));
        assert_eq!(grid.begin_search().unwrap_err(), SearchError::NotConfigured);
    }

    #[test]
    fn diagonal_path_across_open_three_by_three() {
        let mut grid = open_grid(3);
        grid.set_start(Position::new(0, 0));
        grid.set_end(Position::new(2, 2));

        let state = grid.begin_search().unwrap();

        let SearchState::PathFound(result) = state else {
            panic!("expected a path");
        };
        assert_eq!(
            result.path,
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
        assert_eq!(result.total_cost, 2 * DIAGONAL_COST);
        assert!(grid.has_found_path());
        assert_eq!(grid.path(), result.path.as_slice());
    }

    #[test]
    fn path_is_contiguous_with_monotone_cost() {
        let mut grid = open_grid(8);
        grid.set_start(Position::new(0, 0));
        grid.set_end(Position::new(7, 7));

        let SearchState::PathFound(result) = grid.begin_search().unwrap() else {
            panic!("expected a path");
        };

        assert_eq!(result.path.first(), Some(&Position::new(0, 0)));
        assert_eq!(result.path.last(), Some(&Position::new(7, 7)));

        for pair in result.path.windows(2) {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            assert!(dx <= 1 && dy <= 1 && (dx, dy) != (0, 0));

            assert!(
                grid.cell(pair[0]).movement_cost < grid.cell(pair[1]).movement_cost,
                "movement cost must increase along the path"
            );
        }
    }

    #[test]
    fn walls_force_a_detour() {
        let mut grid = open_grid(3);
        grid.set_start(Position::new(0, 1));
        grid.set_end(Position::new(2, 1));
        grid.add_wall(Position::new(1, 0));
        grid.add_wall(Position::new(1, 1));

        let SearchState::PathFound(result) = grid.begin_search().unwrap() else {
            panic!("expected a path");
        };

        assert!(!result.path.contains(&Position::new(1, 1)));
        assert!(!result.path.contains(&Position::new(1, 0)));
        assert!(result.path.contains(&Position::new(1, 2)));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut grid = open_grid(5);
        grid.set_start(Position::new(0, 0));
        grid.set_end(Position::new(4, 4));
        for wall in [
            Position::new(3, 3),
            Position::new(3, 4),
            Position::new(4, 3),
        ] {
            grid.add_wall(wall);
        }

        assert_eq!(grid.begin_search().unwrap(), SearchState::NoPathFound);
        assert!(grid.path().is_empty());
        assert!(!grid.has_found_path());
    }

    #[test]
    fn repeated_searches_are_identical() {
        let mut grid = open_grid(6);
        grid.set_start(Position::new(0, 5));
        grid.set_end(Position::new(5, 0));
        grid.add_wall(Position::new(2, 2));
        grid.add_wall(Position::new(3, 2));
        grid.add_wall(Position::new(2, 3));

        let first = grid.begin_search().unwrap();
        let second = grid.begin_search().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn single_step_search() {
        let mut grid = open_grid(2);
        grid.set_start(Position::new(0, 0));
        grid.set_end(Position::new(1, 1));

        let SearchState::PathFound(result) = grid.begin_search().unwrap() else {
            panic!("expected a path");
        };
        assert_eq!(
            result.path,
            vec![Position::new(0, 0), Position::new(1, 1)]
        );
        assert_eq!(result.total_cost, DIAGONAL_COST);
    }

    #[test]
    fn movement_cost_distinguishes_diagonals() {
        let a = Position::new(3, 3);
        assert_eq!(movement_cost(a, Position::new(4, 3)), HORIZONTAL_COST);
        assert_eq!(movement_cost(a, Position::new(3, 2)), VERTICAL_COST);
        assert_eq!(movement_cost(a, Position::new(4, 4)), DIAGONAL_COST);
        assert_eq!(movement_cost(a, Position::new(2, 4)), DIAGONAL_COST);
    }

    #[test]
    fn search_through_a_parsed_maze() {
        // 2x2 maze, all interior passages open except a wall between the
        // two top cells
        let mut grid = Grid::from_maze("1011 1110\n1111 1111", (500, 500)).unwrap();
        grid.set_start(Position::new(1, 1));
        grid.set_end(Position::new(3, 1));

        let SearchState::PathFound(result) = grid.begin_search().unwrap() else {
            panic!("expected a path");
        };

        // the direct passage (2, 1) is walled, so the route dips below it
        assert!(!result.path.contains(&Position::new(2, 1)));
        assert_eq!(result.path.first(), Some(&Position::new(1, 1)));
        assert_eq!(result.path.last(), Some(&Position::new(3, 1)));
    }
}
