use std::num::NonZero;

use ndarray::Ix;

pub type Coord = usize;
pub type Dimension = NonZero<Coord>;

/// A cell position on a rectangular lattice.
///
/// Ordering is by row, then column, which is the scan order every decoder walks.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
// row, column
pub struct Point(pub Coord, pub Coord);

impl Point {
    #[inline]
    pub fn row(&self) -> Coord {
        self.0
    }

    #[inline]
    pub fn col(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    /// Step by `(rows, columns)`. Stepping off the top or left edge wraps to a huge coordinate, which no lattice contains.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Point {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}
