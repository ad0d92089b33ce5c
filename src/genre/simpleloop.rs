//! Simple Loop: draw one loop through every unshaded cell, avoiding the shaded ones.

use tracing::trace;

use crate::builder::PuzzleError;
use crate::genre::{check_alias, row_tokens, Clues, Context, DecodeError};
use crate::location::Point;
use crate::loops::{LoopSegment, EMPTY};
use crate::symbol::SymbolSet;

pub const ALIASES: &[&str] = &["simpleloop"];

const RADIX: u32 = 32;
const BITS: [u32; 5] = [16, 8, 4, 2, 1];

/// Marks a shaded cell. Cells absent from the clues are unshaded.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Shaded;

/// Decode a URL payload of base-32 digits, each packing five cells as bits, most significant first.
///
/// Decoding stops once every cell is read; a short payload leaves the remaining cells unshaded.
pub fn decode(alias: &str, width: usize, height: usize, payload: &str) -> Result<Clues<Shaded>, DecodeError> {
    check_alias(ALIASES, alias)?;

    let cells = width * height;
    let mut clues = Clues::default();
    let mut cell = 0;
    for ch in payload.chars() {
        if cell >= cells {
            break;
        }

        let value = ch.to_digit(RADIX).ok_or(DecodeError::InvalidDigit { ch, radix: RADIX })?;
        for bit in BITS {
            if cell >= cells {
                break;
            }
            if value & bit != 0 {
                clues.insert(Point(cell / width, cell % width), Shaded);
            }
            cell += 1;
        }
    }

    trace!(shaded = clues.len(), "decoded simpleloop payload");
    Ok(clues)
}

/// Decode a row grid: `*` is shaded and any other token unshaded.
pub fn decode_rows(alias: &str, width: usize, height: usize, rows: &[String]) -> Result<Clues<Shaded>, DecodeError> {
    check_alias(ALIASES, alias)?;

    Ok(row_tokens(width, height, rows)?
        .into_iter()
        .filter(|(_, token)| *token == "*")
        .map(|(point, _)| (point, Shaded))
        .collect())
}

pub fn encode(width: usize, height: usize, clues: &Clues<Shaded>) -> String {
    let cells = width * height;
    (0..cells.div_ceil(5))
        .map(|digit| {
            let value = BITS.iter()
                .enumerate()
                .map(|(k, bit)| (digit * 5 + k, bit))
                .filter(|(cell, _)| *cell < cells && clues.contains(Point(cell / width, cell % width)))
                .map(|(_, bit)| bit)
                .sum::<u32>();
            char::from_digit(value, RADIX).unwrap_or('0')
        })
        .collect()
}

pub fn symbols() -> SymbolSet {
    LoopSegment::symbols()
}

pub(crate) fn add_constraints(clues: &Clues<Shaded>, ctx: &mut Context) -> Result<(), PuzzleError> {
    let grid = ctx.grid;
    let lattice = grid.lattice();
    let solver = &mut *ctx.solver;
    let loops = ctx.loops.as_deref_mut().ok_or(PuzzleError::MissingSymbols("loop segment"))?;
    let empty = loops.empty().ok_or(PuzzleError::MissingSymbols(EMPTY))?;

    let mut first_unshaded = None;
    for point in lattice.points() {
        match clues.contains(point) {
            true => solver.require(grid.cell_is(point, empty)),
            false => {
                solver.require(loops.on_loop(lattice, point));
                first_unshaded.get_or_insert(point);
            }
        }
    }

    if let Some(point) = first_unshaded {
        loops.pin_root(lattice, point, solver);
    }

    Ok(())
}

pub fn print_override(clues: &Clues<Shaded>, point: Point) -> Option<String> {
    clues.contains(point).then(|| "\u{25ae}".to_owned())
}
