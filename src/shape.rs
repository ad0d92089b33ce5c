use strum::VariantArray;

use crate::location::Point;

/// A step between edge-sharing cells of a rectangular lattice.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Directions which, upon stepping, land on a cell with a higher scan index than the origin.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::East, Self::South];

    /// Attempt the step from `location`; the result may lie outside any lattice.
    pub fn attempt_from(&self, location: Point) -> Point {
        location.offset_by(self.delta())
    }

    /// `(rows, columns)` moved by one step.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }

    pub fn invert(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    /// The direction from `a` to `b` if they share an edge.
    pub fn between(a: Point, b: Point) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    /// Single-letter label, as used in loop symbol names.
    pub fn letter(&self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}
