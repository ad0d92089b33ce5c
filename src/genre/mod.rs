//! The supported puzzle genres.
//!
//! Every genre supplies the same four capabilities: decode a payload into [`Clues`], name its cell [`SymbolSet`], add its
//! rules to a [`Context`], and override how clue cells print. [`Genre`] is the registry: a fixed set of variants looked up
//! by alias.

use std::collections::BTreeMap;

use strum::VariantArray;
use thiserror::Error;

use crate::builder::PuzzleError;
use crate::grid::SymbolGrid;
use crate::lattice::Lattice;
use crate::location::Point;
use crate::loops::LoopConstrainer;
use crate::regions::RegionConstrainer;
use crate::solver::SatSolver;
use crate::source::{Payload, PuzzleData};
use crate::symbol::{SymbolId, SymbolSet};

pub mod masyu;
pub mod nurikabe;
pub mod simpleloop;

/// Reasons a payload cannot be decoded.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DecodeError {
    /// The payload was handed to a decoder for another genre.
    #[error("{found:?} is not an alias of {expected}")]
    GenreMismatch { expected: &'static str, found: String },
    /// A payload character is not a digit of the genre's radix.
    #[error("{ch:?} is not a base-{radix} digit")]
    InvalidDigit { ch: char, radix: u32 },
    /// An escape sequence runs past the end of the payload.
    #[error("escape {escape:?} at offset {offset} runs past the end of the payload")]
    TruncatedEscape { escape: char, offset: usize },
    /// A URL does not end in `<genre>/<width>/<height>/<payload>`.
    #[error("malformed puzzle URL {0:?}")]
    MalformedUrl(String),
    /// Exported file data lacks the `pzprv3` header, genre or dimensions.
    #[error("malformed puzzle file data: {0}")]
    MalformedFileData(String),
    /// A row-grid payload has fewer rows than the puzzle is tall.
    #[error("expected {expected} rows of cells, found {found}")]
    MalformedRows { expected: usize, found: usize },
    /// A row-grid payload holds a token the genre does not use.
    #[error("unrecognised cell token {0:?}")]
    InvalidToken(String),
}

/// Sparse clues keyed by cell. What an absent key means is up to each genre and documented on its clue type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clues<T> {
    clues: BTreeMap<Point, T>,
}

impl<T> Default for Clues<T> {
    fn default() -> Self {
        Self { clues: BTreeMap::new() }
    }
}

impl<T> Clues<T> {
    pub(crate) fn insert(&mut self, point: Point, clue: T) {
        self.clues.insert(point, clue);
    }

    pub fn get(&self, point: Point) -> Option<&T> {
        self.clues.get(&point)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.clues.contains_key(&point)
    }

    /// Clues in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        self.clues.iter().map(|(point, clue)| (*point, clue))
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }
}

impl<T> FromIterator<(Point, T)> for Clues<T> {
    fn from_iter<I: IntoIterator<Item = (Point, T)>>(iter: I) -> Self {
        Self { clues: iter.into_iter().collect() }
    }
}

/// A registered puzzle genre.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, VariantArray)]
pub enum Genre {
    Masyu,
    SimpleLoop,
    Nurikabe,
}

impl Genre {
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Genre::Masyu => masyu::ALIASES,
            Genre::SimpleLoop => simpleloop::ALIASES,
            Genre::Nurikabe => nurikabe::ALIASES,
        }
    }

    /// Look up the genre registered under `alias`.
    pub fn from_alias(alias: &str) -> Option<Self> {
        Self::VARIANTS.iter().find(|genre| genre.aliases().contains(&alias)).copied()
    }

    /// The canonical alias.
    pub fn name(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Whether the genre's rules need the shared single-loop constraints.
    pub fn uses_loop(&self) -> bool {
        matches!(self, Genre::Masyu | Genre::SimpleLoop)
    }

    /// Whether the genre partitions the grid with a region constrainer. A puzzle holds at most one.
    pub fn uses_regions(&self) -> bool {
        matches!(self, Genre::Nurikabe)
    }

    pub fn symbols(&self) -> SymbolSet {
        match self {
            Genre::Masyu => masyu::symbols(),
            Genre::SimpleLoop => simpleloop::symbols(),
            Genre::Nurikabe => nurikabe::symbols(),
        }
    }

    /// Decode the payload of `data`, checking its alias against this genre.
    pub fn decode(&self, data: &PuzzleData) -> Result<Givens, DecodeError> {
        let (alias, width, height) = (data.genre.as_str(), data.width, data.height);
        Ok(match (self, &data.payload) {
            (Genre::Masyu, Payload::Url(payload)) => Givens::Masyu(masyu::decode(alias, width, height, payload)?),
            (Genre::Masyu, Payload::Rows(rows)) => Givens::Masyu(masyu::decode_rows(alias, width, height, rows)?),
            (Genre::SimpleLoop, Payload::Url(payload)) => {
                Givens::SimpleLoop(simpleloop::decode(alias, width, height, payload)?)
            }
            (Genre::SimpleLoop, Payload::Rows(rows)) => {
                Givens::SimpleLoop(simpleloop::decode_rows(alias, width, height, rows)?)
            }
            (Genre::Nurikabe, Payload::Url(payload)) => Givens::Nurikabe(nurikabe::decode(alias, width, height, payload)?),
            (Genre::Nurikabe, Payload::Rows(rows)) => Givens::Nurikabe(nurikabe::decode_rows(alias, width, height, rows)?),
        })
    }
}

pub(crate) fn check_alias(expected: &'static [&'static str], alias: &str) -> Result<(), DecodeError> {
    match expected.contains(&alias) {
        true => Ok(()),
        false => Err(DecodeError::GenreMismatch { expected: expected[0], found: alias.to_owned() }),
    }
}

/// Split a row-grid payload into at most `width` tokens for each of its first `height` rows.
pub(crate) fn row_tokens(width: usize, height: usize, rows: &[String]) -> Result<Vec<(Point, &str)>, DecodeError> {
    if rows.len() < height {
        return Err(DecodeError::MalformedRows { expected: height, found: rows.len() });
    }

    Ok(rows.iter()
        .take(height)
        .enumerate()
        .flat_map(|(row, line)| line.split_whitespace()
            .take(width)
            .enumerate()
            .map(move |(col, token)| (Point(row, col), token)))
        .collect())
}

/// The decoded clues of one puzzle layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Givens {
    Masyu(Clues<masyu::Pearl>),
    SimpleLoop(Clues<simpleloop::Shaded>),
    Nurikabe(Clues<nurikabe::IslandClue>),
}

impl Givens {
    pub fn genre(&self) -> Genre {
        match self {
            Givens::Masyu(_) => Genre::Masyu,
            Givens::SimpleLoop(_) => Genre::SimpleLoop,
            Givens::Nurikabe(_) => Genre::Nurikabe,
        }
    }

    /// Re-encode as a URL payload. [`None`] if some clue has no encoding.
    pub fn encode(&self, lattice: &Lattice) -> Option<String> {
        let (width, height) = (lattice.width(), lattice.height());
        match self {
            Givens::Masyu(clues) => Some(masyu::encode(width, height, clues)),
            Givens::SimpleLoop(clues) => Some(simpleloop::encode(width, height, clues)),
            Givens::Nurikabe(clues) => nurikabe::encode(width, height, clues),
        }
    }

    /// Add this layer's rules.
    pub fn add_constraints(&self, ctx: &mut Context) -> Result<(), PuzzleError> {
        match self {
            Givens::Masyu(clues) => masyu::add_constraints(clues, ctx),
            Givens::SimpleLoop(clues) => simpleloop::add_constraints(clues, ctx),
            Givens::Nurikabe(clues) => nurikabe::add_constraints(clues, ctx),
        }
    }

    /// Text to print at `point` instead of the label of the symbol it was solved to, if any.
    pub fn print_override(&self, point: Point, _symbol: SymbolId) -> Option<String> {
        match self {
            Givens::Masyu(clues) => masyu::print_override(clues, point),
            Givens::SimpleLoop(clues) => simpleloop::print_override(clues, point),
            Givens::Nurikabe(clues) => nurikabe::print_override(clues, point),
        }
    }
}

/// Everything a genre may add constraints to.
pub struct Context<'a> {
    pub grid: &'a SymbolGrid,
    pub solver: &'a mut SatSolver,
    /// Present whenever any layer's genre [uses a loop](Genre::uses_loop), shared by all of them.
    pub loops: Option<&'a mut LoopConstrainer>,
    /// Filled in by a genre that partitions the grid into regions.
    pub regions: &'a mut Option<RegionConstrainer>,
    /// Masyu layers swap their black and white pearl rules.
    pub ura_masyu: bool,
}
