//! Masyu: draw one loop through every pearl. The loop turns on black pearls and goes straight through both cells next to
//! one; it goes straight through white pearls and turns in at least one cell next to one.

use itertools::Itertools;
use tracing::trace;

use crate::builder::PuzzleError;
use crate::genre::{check_alias, row_tokens, Clues, Context, DecodeError};
use crate::location::Point;
use crate::loops::LoopSegment;
use crate::symbol::SymbolSet;

pub const ALIASES: &[&str] = &["masyu", "mashu"];

const RADIX: u32 = 27;
const PLACES: [u32; 3] = [9, 3, 1];

/// A pearl clue. Cells without a pearl carry no clue.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pearl {
    White,
    Black,
}

impl Pearl {
    fn from_trit(trit: u32) -> Option<Self> {
        match trit {
            1 => Some(Pearl::White),
            2 => Some(Pearl::Black),
            _ => None,
        }
    }

    /// The pearl whose rules apply in Ura-Masyu.
    pub fn swapped(&self) -> Self {
        match self {
            Pearl::White => Pearl::Black,
            Pearl::Black => Pearl::White,
        }
    }

    fn trit(pearl: Option<&Self>) -> u32 {
        match pearl {
            None => 0,
            Some(Pearl::White) => 1,
            Some(Pearl::Black) => 2,
        }
    }
}

/// Decode a URL payload of base-27 digits, each packing three cells as ternary digits, most significant first.
///
/// Only the first `ceil(width * height / 3)` characters are read and cells past the end of the grid are dropped; a short
/// payload leaves the remaining cells without pearls.
pub fn decode(alias: &str, width: usize, height: usize, payload: &str) -> Result<Clues<Pearl>, DecodeError> {
    check_alias(ALIASES, alias)?;

    let cells = width * height;
    let mut clues = Clues::default();
    for (digit, ch) in payload.chars().take(cells.div_ceil(3)).enumerate() {
        let value = ch.to_digit(RADIX).ok_or(DecodeError::InvalidDigit { ch, radix: RADIX })?;
        for (k, place) in PLACES.iter().enumerate() {
            let cell = digit * 3 + k;
            if let Some(pearl) = Pearl::from_trit(value / place % 3).filter(|_| cell < cells) {
                clues.insert(Point(cell / width, cell % width), pearl);
            }
        }
    }

    trace!(pearls = clues.len(), "decoded masyu payload");
    Ok(clues)
}

/// Decode a row grid: `.` is empty, `1` a white pearl and `2` a black pearl.
pub fn decode_rows(alias: &str, width: usize, height: usize, rows: &[String]) -> Result<Clues<Pearl>, DecodeError> {
    check_alias(ALIASES, alias)?;

    let mut clues = Clues::default();
    for (point, token) in row_tokens(width, height, rows)? {
        match token {
            "." => {}
            "1" => clues.insert(point, Pearl::White),
            "2" => clues.insert(point, Pearl::Black),
            _ => return Err(DecodeError::InvalidToken(token.to_owned())),
        }
    }
    Ok(clues)
}

pub fn encode(width: usize, height: usize, clues: &Clues<Pearl>) -> String {
    let cells = width * height;
    (0..cells.div_ceil(3))
        .map(|digit| {
            let value = PLACES.iter()
                .enumerate()
                .map(|(k, place)| (digit * 3 + k, place))
                .filter(|(cell, _)| *cell < cells)
                .map(|(cell, place)| place * Pearl::trit(clues.get(Point(cell / width, cell % width))))
                .sum::<u32>();
            char::from_digit(value, RADIX).unwrap_or('0')
        })
        .collect()
}

pub fn symbols() -> SymbolSet {
    LoopSegment::symbols()
}

pub(crate) fn add_constraints(clues: &Clues<Pearl>, ctx: &mut Context) -> Result<(), PuzzleError> {
    let grid = ctx.grid;
    let ura = ctx.ura_masyu;
    let lattice = grid.lattice();
    let solver = &mut *ctx.solver;
    let loops = ctx.loops.as_deref_mut().ok_or(PuzzleError::MissingSymbols("loop segment"))?;

    // every pearl is on the loop, so the first one can carry the root
    if let Some((first, _)) = clues.iter().next() {
        loops.pin_root(lattice, first, solver);
    }

    let straights = loops.segments_of(LoopSegment::STRAIGHTS);
    let turns = loops.segments_of(LoopSegment::TURNS);

    for (point, pearl) in clues.iter() {
        let rules = match ura {
            true => pearl.swapped(),
            false => *pearl,
        };
        match rules {
            Pearl::Black => {
                solver.add_formula(vec![grid.cell_is_one_of(point, &turns)]);
                for (direction, neighbor) in lattice.neighbors(point) {
                    let straight = grid.cell_is(neighbor, loops.segment(LoopSegment::straight_along(direction)));
                    let clauses = LoopSegment::TURNS.iter()
                        .filter(|turn| turn.exits_toward(direction))
                        .map(|turn| vec![!grid.cell_is(point, loops.segment(*turn)), straight])
                        .collect_vec();
                    solver.add_formula(clauses);
                }
            }
            Pearl::White => {
                solver.add_formula(vec![grid.cell_is_one_of(point, &straights)]);
                for straight in LoopSegment::STRAIGHTS {
                    let mut clause = vec![!grid.cell_is(point, loops.segment(*straight))];
                    for neighbor in straight.exits().iter().filter_map(|direction| lattice.neighbor(point, *direction)) {
                        clause.extend(grid.cell_is_one_of(neighbor, &turns));
                    }
                    solver.add_formula(vec![clause]);
                }
            }
        }
    }

    Ok(())
}

pub fn print_override(clues: &Clues<Pearl>, point: Point) -> Option<String> {
    clues.get(point).map(|pearl| match pearl {
        Pearl::White => "\u{25cb}".to_owned(),
        Pearl::Black => "\u{25cf}".to_owned(),
    })
}
