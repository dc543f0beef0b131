//! # Game Module
//!
//! The value types shared by every generation stage and by gameplay:
//! - Tile coordinates and their wrap-aware arithmetic
//! - The closed tile-type enumeration
//! - The finished, queryable dungeon grid

pub mod grid;
pub mod tile;

pub use grid::*;
pub use tile::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D tile coordinate.
///
/// # Examples
///
/// ```
/// use deluge::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.adjacent_positions();
/// assert_eq!(adjacent.len(), 8); // All 8 surrounding positions
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Calculates the Chebyshev (king-move) distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::Position;
    ///
    /// assert_eq!(Position::new(0, 0).chebyshev_distance(Position::new(2, -5)), 5);
    /// ```
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        crate::utils::distance(
            self.x as f64,
            self.y as f64,
            other.x as f64,
            other.y as f64,
        )
    }

    /// Wraps this position onto a toroidal grid of the given extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::Position;
    ///
    /// assert_eq!(Position::new(-1, 12).wrapped(10, 10), Position::new(9, 2));
    /// ```
    pub fn wrapped(self, width: u32, height: u32) -> Position {
        Position::new(wrap_coord(self.x, width), wrap_coord(self.y, height))
    }

    /// Returns all 8 adjacent positions (including diagonals).
    pub fn adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x - 1, self.y - 1), // NW
            Position::new(self.x, self.y - 1),     // N
            Position::new(self.x + 1, self.y - 1), // NE
            Position::new(self.x - 1, self.y),     // W
            Position::new(self.x + 1, self.y),     // E
            Position::new(self.x - 1, self.y + 1), // SW
            Position::new(self.x, self.y + 1),     // S
            Position::new(self.x + 1, self.y + 1), // SE
        ]
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }

    /// Steps `distance` tiles in the given direction.
    pub fn step(self, direction: Direction, distance: i32) -> Position {
        let delta = direction.to_delta();
        Position::new(self.x + delta.x * distance, self.y + delta.y * distance)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Wraps a single coordinate into `[0, extent)`, including negative inputs.
pub fn wrap_coord(value: i32, extent: u32) -> i32 {
    let extent = extent.max(1) as i32;
    ((value % extent) + extent) % extent
}

/// Wraps a continuous world coordinate into `[0, extent)`.
pub fn wrap_world(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = ((value % extent) + extent) % extent;
    // -0.0 and values that round up to `extent` both land back on the origin
    if wrapped >= extent {
        0.0
    } else {
        wrapped.abs()
    }
}

/// Cardinal directions, used for room sides and corridor orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use deluge::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Whether this direction runs along the y axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// Returns the 4 cardinal directions in clockwise order from north.
    pub fn cardinal() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }
}
