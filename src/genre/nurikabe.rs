//! Nurikabe: shade cells so that every clue sits in an unshaded island of its size, every island holds exactly one clue,
//! the shaded cells form one connected sea, and no 2x2 block is fully shaded.

use std::collections::BTreeSet;

use itertools::Itertools;
use strum::VariantArray;
use tracing::{debug, trace};

use crate::builder::PuzzleError;
use crate::genre::{check_alias, row_tokens, Clues, Context, DecodeError};
use crate::lattice::Lattice;
use crate::location::Point;
use crate::regions::RegionConstrainer;
use crate::shape::Direction;
use crate::solver::Term;
use crate::symbol::SymbolSet;

pub const ALIASES: &[&str] = &["nurikabe"];

pub const SHADED: &str = "B";
pub const UNSHADED: &str = "W";

/// An island clue. Cells without one are unknown and may be shaded or not.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IslandClue {
    /// The island holds exactly this many cells.
    Size(usize),
    /// The cell roots an island of unknown size.
    Unknown,
}

fn hex_value(ch: char) -> Option<usize> {
    matches!(ch, '0'..='9' | 'a'..='f').then(|| ch.to_digit(16)).flatten().map(|value| value as usize)
}

fn escaped(chars: &[char], at: usize, digits: usize) -> Result<usize, DecodeError> {
    let escape = chars[at];
    let body = chars.get(at + 1..at + 1 + digits).ok_or(DecodeError::TruncatedEscape { escape, offset: at })?;
    body.iter().try_fold(0, |value, ch| match ch.to_digit(16) {
        Some(digit) => Ok(value * 16 + digit as usize),
        None => Err(DecodeError::InvalidDigit { ch: *ch, radix: 16 }),
    })
}

/// Decode a URL payload.
///
/// Each clue takes the next cell: a hex digit is its own value, `-` takes two hex digits, `+` three, `=` three plus 4096,
/// `%` three plus 8192, and `.` is an island of unknown size. A letter `g` to `z` skips 1 to 20 cells. Any other character
/// is ignored. A short payload leaves the remaining cells unknown.
pub fn decode(alias: &str, width: usize, height: usize, payload: &str) -> Result<Clues<IslandClue>, DecodeError> {
    check_alias(ALIASES, alias)?;

    let cells = width * height;
    let chars = payload.chars().collect_vec();
    let mut clues = Clues::default();
    let (mut at, mut cell) = (0, 0);
    while at < chars.len() && cell < cells {
        let ch = chars[at];
        let (clue, consumed) = match ch {
            '.' => (Some(IslandClue::Unknown), 1),
            '-' => (Some(IslandClue::Size(escaped(&chars, at, 2)?)), 3),
            '+' => (Some(IslandClue::Size(escaped(&chars, at, 3)?)), 4),
            '=' => (Some(IslandClue::Size(escaped(&chars, at, 3)? + 4096)), 4),
            '%' => (Some(IslandClue::Size(escaped(&chars, at, 3)? + 8192)), 4),
            'g'..='z' => {
                cell += ch.to_digit(36).map(|skip| skip as usize - 15).unwrap_or_default();
                (None, 1)
            }
            _ => match hex_value(ch) {
                Some(value) => (Some(IslandClue::Size(value)), 1),
                None => (None, 1),
            },
        };

        if let Some(clue) = clue {
            clues.insert(Point(cell / width, cell % width), clue);
            cell += 1;
        }
        at += consumed;
    }

    trace!(clues = clues.len(), "decoded nurikabe payload");
    Ok(clues)
}

/// Decode a row grid: `.` is unknown, `?` an island of unknown size and a decimal number an island of that size.
pub fn decode_rows(alias: &str, width: usize, height: usize, rows: &[String]) -> Result<Clues<IslandClue>, DecodeError> {
    check_alias(ALIASES, alias)?;

    let mut clues = Clues::default();
    for (point, token) in row_tokens(width, height, rows)? {
        match token {
            "." => {}
            "?" => clues.insert(point, IslandClue::Unknown),
            _ => {
                let size = token.parse().map_err(|_| DecodeError::InvalidToken(token.to_owned()))?;
                clues.insert(point, IslandClue::Size(size));
            }
        }
    }
    Ok(clues)
}

fn encode_clue(clue: &IslandClue) -> Option<String> {
    Some(match *clue {
        IslandClue::Unknown => ".".to_owned(),
        IslandClue::Size(size @ 0..=0xf) => format!("{:x}", size),
        IslandClue::Size(size @ 0x10..=0xff) => format!("-{:02x}", size),
        IslandClue::Size(size @ 0x100..=0xfff) => format!("+{:03x}", size),
        IslandClue::Size(size @ 0x1000..=0x1fff) => format!("={:03x}", size - 4096),
        IslandClue::Size(size @ 0x2000..=0x2fff) => format!("%{:03x}", size - 8192),
        IslandClue::Size(_) => return None,
    })
}

fn encode_gap(gap: usize, out: &mut String) {
    let mut left = gap;
    while left > 0 {
        let run = left.min(20);
        out.extend(char::from_digit((run + 15) as u32, 36));
        left -= run;
    }
}

/// Encode `clues` as a URL payload. [`None`] if a clue is larger than any escape can hold.
pub fn encode(width: usize, height: usize, clues: &Clues<IslandClue>) -> Option<String> {
    let mut out = String::new();
    let mut gap = 0;
    for cell in 0..width * height {
        match clues.get(Point(cell / width, cell % width)) {
            Some(clue) => {
                encode_gap(gap, &mut out);
                gap = 0;
                out.push_str(&encode_clue(clue)?);
            }
            None => gap += 1,
        }
    }
    encode_gap(gap, &mut out);
    Some(out)
}

pub fn symbols() -> SymbolSet {
    SymbolSet::new([(SHADED, "\u{2588}"), (UNSHADED, " ")])
}

/// Cells that must be shaded whatever the solution: the neighbors of a 1, a cell between two clues in a line, and the two
/// cells touching both of two diagonally adjacent clues.
fn forced_sea(lattice: &Lattice, clues: &Clues<IslandClue>) -> BTreeSet<Point> {
    let mut sea = BTreeSet::new();
    for (point, clue) in clues.iter() {
        if *clue == IslandClue::Size(1) {
            sea.extend(lattice.neighbors(point).into_iter().map(|(_, neighbor)| neighbor));
            continue;
        }

        for direction in Direction::VARIANTS {
            if let Some(between) = lattice.neighbor(point, *direction) {
                if lattice.neighbor(between, *direction).is_some_and(|far| clues.contains(far)) {
                    sea.insert(between);
                }
            }
        }

        for (first, second) in Lattice::diagonal_steps() {
            let (Some(a), Some(b)) = (lattice.neighbor(point, first), lattice.neighbor(point, second)) else { continue };
            if lattice.neighbor(a, second).is_some_and(|diagonal| clues.contains(diagonal)) {
                sea.insert(a);
                sea.insert(b);
            }
        }
    }
    sea
}

pub(crate) fn add_constraints(clues: &Clues<IslandClue>, ctx: &mut Context) -> Result<(), PuzzleError> {
    if ctx.regions.is_some() {
        return Err(PuzzleError::SharedRegions);
    }

    let grid = ctx.grid;
    let lattice = grid.lattice();
    let solver = &mut *ctx.solver;
    let shaded = grid.symbols().index_of(SHADED).ok_or(PuzzleError::MissingSymbols(SHADED))?;
    let unshaded = grid.symbols().index_of(UNSHADED).ok_or(PuzzleError::MissingSymbols(UNSHADED))?;
    let is_shaded = |point: Point| Term::Lit(grid.cell_is(point, shaded));
    let is_unshaded = |point: Point| Term::Lit(grid.cell_is(point, unshaded));

    // the sea's size is only known when every clue is
    let sizes = clues.iter()
        .map(|(_, clue)| match clue {
            IslandClue::Size(size) => Some(*size),
            IslandClue::Unknown => None,
        })
        .collect::<Option<Vec<_>>>();
    let sea_size = match &sizes {
        Some(sizes) => match lattice.len().checked_sub(sizes.iter().sum()) {
            Some(sea_size) => Some(sea_size),
            None => {
                debug!("clues cover more cells than the grid has");
                solver.require(false);
                return Ok(());
            }
        },
        None => None,
    };
    let (min_size, max_size) = match (&sizes, sea_size) {
        (Some(sizes), Some(sea_size)) => {
            let all = sizes.iter().copied().chain((sea_size > 0).then_some(sea_size)).collect_vec();
            (all.iter().min().copied(), all.iter().max().copied())
        }
        _ => (None, None),
    };

    let mut regions = RegionConstrainer::new(lattice, solver, min_size, max_size);

    for (point, clue) in clues.iter() {
        solver.require(is_unshaded(point));
        match clue {
            IslandClue::Size(size) => regions.require_region_size(lattice, point, *size, solver),
            IslandClue::Unknown => solver.require(regions.is_root(lattice, point)),
        }
    }

    let forced = forced_sea(lattice, clues);
    for point in &forced {
        solver.require(is_shaded(*point));
    }

    let free = lattice.points().filter(|point| !clues.contains(*point)).collect_vec();
    match forced.first().copied() {
        Some(sea_root) => {
            trace!(?sea_root, "rooting the sea at a forced cell");
            solver.require(regions.is_root(lattice, sea_root));
            if let Some(sea_size) = sea_size.filter(|size| *size > 0) {
                regions.require_region_size(lattice, sea_root, sea_size, solver);
            }
            for point in &free {
                if *point != sea_root {
                    solver.require(!regions.is_root(lattice, *point));
                }
                let in_sea = regions.in_region_of(lattice, *point, sea_root, solver);
                solver.implies(&[is_shaded(*point)], in_sea);
                solver.implies(&[in_sea], is_shaded(*point));
            }
        }
        None => {
            let mut shaded_roots = Vec::new();
            for point in &free {
                let root = regions.is_root(lattice, *point);
                solver.implies(&[is_unshaded(*point)], !root);
                shaded_roots.push(solver.define_and(&[root, is_shaded(*point)]));
            }
            let shaded_roots = shaded_roots.into_iter()
                .filter_map(|term| match term {
                    Term::Lit(lit) => Some(lit),
                    Term::Const(_) => None,
                })
                .collect_vec();
            solver.require_at_most_one(&shaded_roots);

            if let Some(sea_size) = sea_size {
                let all_shaded = lattice.points().map(is_shaded).collect_vec();
                solver.require_count(&all_shaded, sea_size);
            }
        }
    }

    // an unshaded cell belongs to one of the clued islands
    for point in &free {
        let islands = clues.iter()
            .filter(|(root, clue)| match clue {
                IslandClue::Size(size) => point.row().abs_diff(root.row()) + point.col().abs_diff(root.col()) < *size,
                IslandClue::Unknown => true,
            })
            .map(|(root, _)| regions.in_region_of(lattice, *point, root, solver))
            .collect_vec();
        let in_island = solver.define_or(&islands);
        solver.implies(&[is_unshaded(*point)], in_island);
        solver.implies(&[in_island], is_unshaded(*point));
    }

    for square in lattice.squares() {
        solver.add_clause(square.map(|point| !is_shaded(point)));
    }

    regions.couple_classes(grid, &[shaded, unshaded], solver);

    debug!(clues = clues.len(), forced = forced.len(), ?sea_size, "added nurikabe constraints");
    *ctx.regions = Some(regions);
    Ok(())
}

pub fn print_override(clues: &Clues<IslandClue>, point: Point) -> Option<String> {
    clues.get(point).map(|clue| match clue {
        IslandClue::Size(size) => size.to_string(),
        IslandClue::Unknown => "?".to_owned(),
    })
}
