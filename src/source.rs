//! Where puzzle records come from.

use std::error::Error;

use itertools::Itertools;
use tracing::debug;

use crate::genre::DecodeError;

const FILE_HEADER: &str = "pzprv3";

/// The clue part of a puzzle record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload {
    /// The packed last segment of a puzzle URL.
    Url(String),
    /// Whitespace-separated cell tokens, one line per row, as in exported file data.
    Rows(Vec<String>),
}

/// One puzzle layer as handed over by a data source: the genre alias, dimensions and payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PuzzleData {
    pub genre: String,
    pub width: usize,
    pub height: usize,
    pub payload: Payload,
}

impl PuzzleData {
    pub fn new(genre: &str, width: usize, height: usize, payload: Payload) -> Self {
        Self { genre: genre.to_owned(), width, height, payload }
    }

    /// Split a puzzle URL of the form `.../<genre>/<width>/<height>/<payload>`.
    ///
    /// The genre segment may carry a prefix up to a `?`, as in `p?masyu`. Nothing before the genre segment is inspected.
    pub fn from_url(url: &str) -> Result<Self, DecodeError> {
        let malformed = || DecodeError::MalformedUrl(url.to_owned());
        let segments = url.trim().split('/').collect_vec();
        let [.., genre, width, height, payload] = segments.as_slice() else {
            return Err(malformed());
        };

        let genre = genre.rsplit('?').next().unwrap_or_default();
        let width = width.parse().map_err(|_| malformed())?;
        let height = height.parse().map_err(|_| malformed())?;
        debug!(genre, width, height, "parsed puzzle URL");
        Ok(Self::new(genre, width, height, Payload::Url(payload.to_string())))
    }

    /// Parse exported `pzprv3` file data: the header line, the genre, the row count, the column count, then one line per
    /// row.
    pub fn from_file_data(data: &str) -> Result<Self, DecodeError> {
        let lines = data.trim().lines().map(str::trim).collect_vec();
        let [header, genre, rows, cols, grid @ ..] = lines.as_slice() else {
            return Err(DecodeError::MalformedFileData(format!("expected at least 4 lines, found {}", lines.len())));
        };
        if *header != FILE_HEADER {
            return Err(DecodeError::MalformedFileData(format!("unknown header {:?}", header)));
        }

        let dimension = |line: &str| line.parse::<usize>()
            .map_err(|_| DecodeError::MalformedFileData(format!("bad dimension {:?}", line)));
        let (height, width) = (dimension(*rows)?, dimension(*cols)?);
        Ok(Self::new(genre, width, height, Payload::Rows(grid.iter().map(|line| line.to_string()).collect_vec())))
    }
}

/// Supplies puzzle records for a URL.
///
/// Whatever the source holds on to while fetching (a connection, a browser session) is acquired and released within each
/// call.
pub trait PuzzleSource {
    type Error: Error + Send + Sync + 'static;

    fn fetch(&mut self, url: &str) -> Result<Vec<PuzzleData>, Self::Error>;
}

/// Reads the puzzle straight out of the URL, without any network access.
#[derive(Copy, Clone, Debug, Default)]
pub struct UrlSource;

impl PuzzleSource for UrlSource {
    type Error = DecodeError;

    fn fetch(&mut self, url: &str) -> Result<Vec<PuzzleData>, Self::Error> {
        Ok(vec![PuzzleData::from_url(url)?])
    }
}

/// Serves exported `pzprv3` file data regardless of the URL asked for.
#[derive(Clone, Debug)]
pub struct FileDataSource {
    data: String,
}

impl FileDataSource {
    pub fn new(data: &str) -> Self {
        Self { data: data.to_owned() }
    }
}

impl PuzzleSource for FileDataSource {
    type Error = DecodeError;

    fn fetch(&mut self, _url: &str) -> Result<Vec<PuzzleData>, Self::Error> {
        Ok(vec![PuzzleData::from_file_data(&self.data)?])
    }
}
