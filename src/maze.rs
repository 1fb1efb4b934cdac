//! Maze-description parsing.
//!
//! A description has one line per maze row; each line holds one
//! whitespace-separated 4-character token per maze column. Token characters
//! encode wall presence on the North, East, South and West side of that cell
//! in that order, `'0'` meaning wall. A maze of side M expands into a
//! `(2M + 1)`-sided grid: maze cell (x, y) becomes the always-open corridor
//! cell (2x+1, 2y+1) and the even-coordinate cells in between carry the
//! walls.

use std::collections::HashSet;
use std::fmt::Display;

use log::debug;

use crate::grid::Position;

/// Token character meaning "wall present".
const WALL_CHAR: char = '0';

/// Characters per token: one wall bit per side.
const TOKEN_LEN: usize = 4;

#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The description has no lines at all (or a blank first line).
    Empty,
    /// A line has the wrong number of tokens. Line numbers are 1-based.
    TokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A token is not exactly four characters long.
    TokenLength { line: usize, token: String },
    /// The number of rows does not match the first line's token count; the
    /// expansion only defines square grids.
    RowCount { expected: usize, found: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "maze description is empty"),
            ParseError::TokenCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} tokens, found {}",
                line, expected, found
            ),
            ParseError::TokenLength { line, token } => {
                write!(f, "line {}: token {:?} is not 4 characters", line, token)
            }
            ParseError::RowCount { expected, found } => {
                write!(f, "expected {} rows, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Expand a maze description into the dimension and wall set of the playable
/// grid. Deterministic: the same text always yields the same wall set.
pub fn parse_maze(text: &str) -> Result<(usize, HashSet<Position>), ParseError> {
    let lines: Vec<&str> = text.lines().collect();

    let maze_side = match lines.first() {
        Some(first) => first.split_whitespace().count(),
        None => 0,
    };
    if maze_side == 0 {
        return Err(ParseError::Empty);
    }
    if lines.len() != maze_side {
        return Err(ParseError::RowCount {
            expected: maze_side,
            found: lines.len(),
        });
    }

    let dimension = 2 * maze_side + 1;
    let n = dimension as i32;
    let mut walls = HashSet::new();

    // the outer border is permanent wall
    for i in 0..n {
        walls.insert(Position::new(i, 0));
        walls.insert(Position::new(i, n - 1));
        walls.insert(Position::new(0, i));
        walls.insert(Position::new(n - 1, i));
    }

    for (y, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != maze_side {
            return Err(ParseError::TokenCount {
                line: y + 1,
                expected: maze_side,
                found: tokens.len(),
            });
        }

        for (x, token) in tokens.iter().enumerate() {
            let sides: Vec<char> = token.chars().collect();
            if sides.len() != TOKEN_LEN {
                return Err(ParseError::TokenLength {
                    line: y + 1,
                    token: token.to_string(),
                });
            }

            let north = sides[0] == WALL_CHAR;
            let east = sides[1] == WALL_CHAR;
            let south = sides[2] == WALL_CHAR;
            let west = sides[3] == WALL_CHAR;

            // corridor cell of this maze cell; its wall cells sit one step
            // away on the even grid lines
            let cx = 2 * x as i32 + 1;
            let cy = 2 * y as i32 + 1;

            if north {
                walls.insert(Position::new(cx, cy - 1));
            }
            if east {
                walls.insert(Position::new(cx + 1, cy));
            }
            if south {
                walls.insert(Position::new(cx, cy + 1));
            }
            if west {
                walls.insert(Position::new(cx - 1, cy));
            }

            // two walled adjacent sides close off their shared corner post
            if north && east {
                walls.insert(Position::new(cx + 1, cy - 1));
            }
            if east && south {
                walls.insert(Position::new(cx + 1, cy + 1));
            }
            if south && west {
                walls.insert(Position::new(cx - 1, cy + 1));
            }
            if west && north {
                walls.insert(Position::new(cx - 1, cy - 1));
            }
        }
    }

    debug!(
        "parsed maze of side {} into a {}x{} grid with {} walls",
        maze_side,
        dimension,
        dimension,
        walls.len()
    );

    Ok((dimension, walls))
}
