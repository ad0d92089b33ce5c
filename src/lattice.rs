use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use strum::VariantArray;
use unordered_pair::UnorderedPair;

use crate::location::{Coord, Dimension, Point};
use crate::shape::Direction;

/// A rectangular lattice of cells joined to their edge-sharing neighbors.
///
/// Cells are numbered in scan order, `index = row * width + col`. That index is the decoding cursor of every genre and the
/// canonical identifier of a region root, so it never changes for the life of a lattice.
#[derive(Clone, Debug)]
pub struct Lattice {
    // width, height
    dims: (Dimension, Dimension),
    // edge weight is the direction from the lower indexed endpoint, always forward
    graph: UnGraphMap<Point, Direction>,
}

impl Lattice {
    /// Construct a lattice with the specified dimensions, specified in `(width, height)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        let (width, height) = (dims.0.get(), dims.1.get());
        let mut graph = UnGraphMap::with_capacity(
            width * height,
            // "horizontal" edges
            (width - 1) * height
                // "vertical" edges
                + (height - 1) * width,
        );

        for row in 0..height {
            for col in 0..width {
                graph.add_node(Point(row, col));
            }
        }

        for point in graph.nodes().collect_vec() {
            // add edges down and to the right, if possible
            for direction in Direction::FORWARD_VARIANTS {
                let other = direction.attempt_from(point);
                if other.row() < height && other.col() < width {
                    graph.add_edge(point, other, *direction);
                }
            }
        }

        Self { dims, graph }
    }

    #[inline]
    pub fn width(&self) -> Coord {
        self.dims.0.get()
    }

    #[inline]
    pub fn height(&self) -> Coord {
        self.dims.1.get()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.row() < self.height() && point.col() < self.width()
    }

    /// Every cell in row-major order. Each call starts a fresh pass.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height())
            .cartesian_product(0..self.width())
            .map(Point::from)
    }

    #[inline]
    pub fn index(&self, point: Point) -> usize {
        point.row() * self.width() + point.col()
    }

    /// Inverse of [`Self::index`].
    #[inline]
    pub fn point(&self, index: usize) -> Point {
        Point(index / self.width(), index % self.width())
    }

    /// The in-bounds edge-sharing neighbors of `point`, labelled with the direction taken to reach them, in
    /// [`Direction`] declaration order.
    pub fn neighbors(&self, point: Point) -> Vec<(Direction, Point)> {
        if !self.graph.contains_node(point) {
            return Vec::new();
        }

        self.graph.edges(point)
            .map(|(n1, n2, direction)| {
                let other = if n1 == point { n2 } else { n1 };
                // the stored direction is correct only when stepping from the lower indexed endpoint
                (if point < other { *direction } else { direction.invert() }, other)
            })
            .sorted()
            .collect_vec()
    }

    /// The neighbor one step from `point` toward `direction`, if it lies on the lattice.
    pub fn neighbor(&self, point: Point, direction: Direction) -> Option<Point> {
        let other = direction.attempt_from(point);
        match self.graph.contains_edge(point, other) {
            true => Some(other),
            false => None,
        }
    }

    /// Every pair of edge-sharing cells, once each, with the forward direction between them.
    pub fn edges(&self) -> impl Iterator<Item = (UnorderedPair<Point>, Direction)> + '_ {
        self.graph.all_edges()
            .map(|(n1, n2, direction)| (UnorderedPair::from((n1, n2)), *direction))
    }

    /// Every 2x2 block of cells.
    pub fn squares(&self) -> impl Iterator<Item = [Point; 4]> + '_ {
        (0..self.height().saturating_sub(1))
            .cartesian_product(0..self.width().saturating_sub(1))
            .map(|(row, col)| [Point(row, col), Point(row, col + 1), Point(row + 1, col), Point(row + 1, col + 1)])
    }

    /// Pairs of perpendicular directions, each pair once.
    pub(crate) fn diagonal_steps() -> impl Iterator<Item = (Direction, Direction)> {
        Direction::VARIANTS.iter()
            .copied()
            .tuple_combinations()
            .filter(|(a, b)| a.is_vertical() != b.is_vertical())
    }
}
