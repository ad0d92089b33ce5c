//! Independent audits of a [`Solution`], working from the solved symbols rather than the constraints that produced them.

use std::collections::HashSet;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use strum::VariantArray;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::board::Solution;
use crate::location::Point;
use crate::loops::LoopSegment;
use crate::regions::Parent;

/// Ways a solved loop can be wrong.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LoopDefect {
    #[error("the solution carries no loop data")]
    NoLoopData,
    #[error("no cell is on the loop")]
    Empty,
    /// A segment leaves the grid or points at a cell that does not point back.
    #[error("the segment at {0:?} is not matched by its neighbor")]
    Dangling(Point),
    /// The loop cells split into more than one cycle.
    #[error("the loop visits {visited} of its {total} cells")]
    Disconnected { visited: usize, total: usize },
    /// Orders are missing, repeated, out of range or do not step by one along the loop.
    #[error("the loop order at {0:?} is inconsistent")]
    Order(Point),
}

/// Ways a solved region partition can be wrong.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RegionDefect {
    #[error("the solution carries no region data")]
    NoRegionData,
    /// Following parents from this cell leaves the grid or never reaches a root.
    #[error("the parent chain from {0:?} does not end at a root")]
    BrokenChain(Point),
    /// The cell's region id is not the scan index of the root its chain ends at.
    #[error("the region id at {0:?} does not name its root")]
    WrongId(Point),
    #[error("the region rooted at {root:?} holds {found} cells instead of {expected}")]
    WrongSize { root: Point, expected: usize, found: usize },
    /// Two neighbors share a region but not a symbol, or a symbol but not a region.
    #[error("{0:?} and {1:?} disagree on region and symbol")]
    ClassMismatch(Point, Point),
    /// A 2x2 block, given by its top-left cell, holds only the pooled symbol.
    #[error("2x2 pool at {0:?}")]
    Pool(Point),
}

fn segment_named(name: &str) -> Option<LoopSegment> {
    LoopSegment::VARIANTS.iter().find(|segment| segment.name() == name).copied()
}

/// Check that the loop segments of `solution` join into a single closed loop, and that the loop orders count along it.
pub fn check_loop(solution: &Solution) -> Result<(), LoopDefect> {
    let orders = solution.loop_orders().ok_or(LoopDefect::NoLoopData)?;
    let lattice = solution.lattice();

    let mut graph: UnGraphMap<Point, ()> = UnGraphMap::new();
    let mut edges = HashSet::new();
    for point in lattice.points() {
        let Some(segment) = segment_named(solution.name_at(point)) else { continue };
        graph.add_node(point);
        for direction in segment.exits() {
            let neighbor = lattice.neighbor(point, direction).ok_or(LoopDefect::Dangling(point))?;
            match segment_named(solution.name_at(neighbor)) {
                Some(other) if other.exits_toward(direction.invert()) => {
                    edges.insert(UnorderedPair::from((point, neighbor)));
                }
                _ => return Err(LoopDefect::Dangling(point)),
            }
        }
    }
    for UnorderedPair(a, b) in &edges {
        graph.add_edge(*a, *b, ());
    }

    let total = graph.node_count();
    let start = graph.nodes().next().ok_or(LoopDefect::Empty)?;
    let mut visited = 0;
    let mut bfs = Bfs::new(&graph, start);
    while bfs.next(&graph).is_some() {
        visited += 1;
    }
    if visited != total {
        return Err(LoopDefect::Disconnected { visited, total });
    }

    let mut seen = HashSet::new();
    for point in lattice.points() {
        let order = orders[lattice.index(point)];
        match (graph.contains_node(point), order) {
            (true, Some(order)) if order < total && seen.insert(order) => {}
            (false, None) => {}
            _ => return Err(LoopDefect::Order(point)),
        }
    }

    for UnorderedPair(a, b) in &edges {
        let (Some(x), Some(y)) = (orders[lattice.index(*a)], orders[lattice.index(*b)]) else {
            return Err(LoopDefect::Order(*a));
        };
        if (x + 1) % total != y && (y + 1) % total != x {
            return Err(LoopDefect::Order(*a));
        }
    }

    Ok(())
}

/// Check that every region of `solution` is a tree of parent links whose id names its root, that every declared size holds,
/// and that neighbors share a region exactly when they share a symbol.
pub fn check_regions(solution: &Solution) -> Result<(), RegionDefect> {
    let records = solution.regions().ok_or(RegionDefect::NoRegionData)?;
    let lattice = solution.lattice();

    for point in lattice.points() {
        let mut current = point;
        let mut steps = 0;
        let root = loop {
            match records[lattice.index(current)].parent {
                Parent::Root => break current,
                Parent::Toward(direction) => {
                    current = lattice.neighbor(current, direction).ok_or(RegionDefect::BrokenChain(point))?;
                }
            }
            steps += 1;
            if steps > lattice.len() {
                return Err(RegionDefect::BrokenChain(point));
            }
        };

        if records[lattice.index(point)].id != lattice.index(root) {
            return Err(RegionDefect::WrongId(point));
        }
    }

    for (root, expected) in solution.declared_sizes() {
        let found = records.iter().filter(|record| record.id == lattice.index(*root)).count();
        if found != *expected {
            return Err(RegionDefect::WrongSize { root: *root, expected: *expected, found });
        }
    }

    for (UnorderedPair(a, b), _) in lattice.edges() {
        let same_region = records[lattice.index(a)].id == records[lattice.index(b)].id;
        let same_symbol = solution.symbol_at(a) == solution.symbol_at(b);
        if same_region != same_symbol {
            return Err(RegionDefect::ClassMismatch(a, b));
        }
    }

    Ok(())
}

/// Check that no 2x2 block of `solution` is made up of the symbol named `pooled` alone.
pub fn check_no_pools(solution: &Solution, pooled: &str) -> Result<(), RegionDefect> {
    match solution.lattice().squares().find(|square| square.iter().all(|point| solution.name_at(*point) == pooled)) {
        Some(square) => Err(RegionDefect::Pool(square[0])),
        None => Ok(()),
    }
}

/// The sizes of the regions of `solution`, by root in scan order.
pub fn region_sizes(solution: &Solution) -> Vec<(Point, usize)> {
    let Some(records) = solution.regions() else { return Vec::new() };
    let lattice = solution.lattice();
    records.iter()
        .map(|record| record.id)
        .counts()
        .into_iter()
        .sorted()
        .map(|(id, size)| (lattice.point(id), size))
        .collect_vec()
}
