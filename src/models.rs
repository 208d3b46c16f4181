//! Data models for the wasp census.
//!
//! This module contains the core data structures used throughout the
//! application: the census table itself, the interaction matrix derived
//! from it, and the per-wasp summary records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Date label formats recognised when computing the census date span.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y", "%d.%m.%Y"];

/// One (nest, date) observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    /// Nobody was seen on the nest that day.
    #[default]
    Empty,
    /// The wasps seen on the nest that day.
    Wasps(BTreeSet<String>),
}

impl Cell {
    /// Parse raw cell text into a cell.
    ///
    /// Tokens are split on commas and stripped of all whitespace; empty
    /// tokens are dropped and duplicates collapse. Text matching one of
    /// `empty_markers` (after trimming) is an empty cell.
    pub fn parse(raw: &str, empty_markers: &[String]) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || empty_markers.iter().any(|m| m == trimmed) {
            return Cell::Empty;
        }

        let wasps: BTreeSet<String> = trimmed
            .split(',')
            .map(|token| token.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|token| !token.is_empty())
            .collect();

        if wasps.is_empty() {
            Cell::Empty
        } else {
            Cell::Wasps(wasps)
        }
    }

    /// Returns true if `wasp` is one of the parsed tokens of this cell.
    pub fn contains(&self, wasp: &str) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Wasps(wasps) => wasps.contains(wasp),
        }
    }

    /// Iterate the wasps in this cell (nothing for an empty cell).
    pub fn wasps(&self) -> impl Iterator<Item = &str> {
        let set = match self {
            Cell::Empty => None,
            Cell::Wasps(wasps) => Some(wasps),
        };
        set.into_iter().flatten().map(String::as_str)
    }

    /// Returns true for [`Cell::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// The census: nests as rows, dates as columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusTable {
    nests: Vec<String>,
    dates: Vec<String>,
    /// Row-major, one row per nest, each exactly `dates.len()` long.
    cells: Vec<Vec<Cell>>,
}

impl CensusTable {
    /// Build a table from date labels and `(nest, cells)` rows.
    ///
    /// Rows shorter than the date list are padded with empty cells and
    /// longer rows are truncated.
    pub fn new(dates: Vec<String>, rows: Vec<(String, Vec<Cell>)>) -> Self {
        let width = dates.len();
        let (nests, cells) = rows
            .into_iter()
            .map(|(nest, mut row)| {
                row.resize(width, Cell::Empty);
                (nest, row)
            })
            .unzip();

        Self {
            nests,
            dates,
            cells,
        }
    }

    /// Nest labels in file order.
    pub fn nests(&self) -> &[String] {
        &self.nests
    }

    /// Date labels in file order.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn nest_count(&self) -> usize {
        self.nests.len()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// The cell for a nest index and a date index.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn cell(&self, nest: usize, date: usize) -> &Cell {
        &self.cells[nest][date]
    }

    /// All cells of one nest, in date order.
    pub fn nest_row(&self, nest: usize) -> &[Cell] {
        &self.cells[nest]
    }

    /// Every cell in the table, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Number of non-empty cells.
    pub fn observation_count(&self) -> usize {
        self.cells().filter(|c| !c.is_empty()).count()
    }

    /// First and last census date, if every date label parses as a date.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let parsed: Option<Vec<NaiveDate>> = self.dates.iter().map(|d| parse_date(d)).collect();
        let parsed = parsed?;
        let first = parsed.iter().min()?;
        let last = parsed.iter().max()?;
        Some((*first, *last))
    }
}

fn parse_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
}

/// Co-occurrence counts for every pair of wasps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    ids: Vec<String>,
    counts: Vec<Vec<u32>>,
}

impl InteractionMatrix {
    /// An all-zero matrix over `ids`.
    pub fn zeroed(ids: Vec<String>) -> Self {
        let n = ids.len();
        Self {
            ids,
            counts: vec![vec![0; n]; n],
        }
    }

    /// Row and column labels.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[cfg(test)]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|i| i == id)
    }

    /// Count for a pair of wasps, or `None` if either is unknown.
    #[cfg(test)]
    pub fn get(&self, a: &str, b: &str) -> Option<u32> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.counts[i][j])
    }

    /// Counts for the wasp at row `i`.
    pub fn row(&self, i: usize) -> &[u32] {
        &self.counts[i]
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, count: u32) {
        self.counts[i][j] = count;
    }

    /// Largest count in the matrix (0 when empty).
    pub fn max_count(&self) -> u32 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Returns true if `counts[i][j] == counts[j][i]` everywhere.
    pub fn is_symmetric(&self) -> bool {
        (0..self.len()).all(|i| (0..i).all(|j| self.counts[i][j] == self.counts[j][i]))
    }
}

/// Aggregates for one wasp across the whole census.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaspSummary {
    /// Wasp identifier.
    pub id: String,
    /// Distinct dates on which the wasp was seen on any nest.
    pub days_seen: usize,
    /// Distinct nests the wasp was ever seen on.
    pub nests_visited: usize,
    /// Other wasps ever seen in the same cell.
    pub partners: BTreeSet<String>,
}

impl WaspSummary {
    pub fn partner_count(&self) -> usize {
        self.partners.len()
    }
}

/// A pair of wasps and how often they shared a nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaspPair {
    pub first: String,
    pub second: String,
    pub count: u32,
}

impl fmt::Display for WaspPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}

/// Metadata about a census run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Input file the census was read from.
    pub input: String,
    /// Number of nests (rows).
    pub nests: usize,
    /// Number of census dates (columns).
    pub dates: usize,
    /// Number of distinct wasps.
    pub wasps: usize,
    /// Number of non-empty cells.
    pub observations: usize,
    /// First census date, when the date labels parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<NaiveDate>,
    /// Last census date, when the date labels parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
}

impl ReportMetadata {
    /// Describe `table` read from `input`.
    pub fn describe(input: &str, table: &CensusTable, wasps: usize) -> Self {
        let span = table.date_span();
        Self {
            input: input.to_string(),
            nests: table.nest_count(),
            dates: table.date_count(),
            wasps,
            observations: table.observation_count(),
            first_date: span.map(|(first, _)| first),
            last_date: span.map(|(_, last)| last),
        }
    }
}

/// Everything a census run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusReport {
    pub metadata: ReportMetadata,
    pub interaction_matrix: InteractionMatrix,
    pub wasps: Vec<WaspSummary>,
}
