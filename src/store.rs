use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use chrono::NaiveDate;
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::{
    cache::ExpiringCache,
    puzzle::{Category, Puzzle, PuzzleError, PuzzleShape},
};

/// Lookup key that resolves to the most recent puzzle.
pub const LATEST: &str = "latest";
/// Lookup key that resolves to a puzzle picked at random.
pub const RANDOM: &str = "random";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse puzzle data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("puzzle record {index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("puzzle {id} has invalid date {date:?}")]
    InvalidDate { id: u64, date: String },

    #[error("puzzle for {date} is invalid: {source}")]
    InvalidPuzzle {
        date: NaiveDate,
        #[source]
        source: PuzzleError,
    },

    #[error("more than one puzzle is dated {0}")]
    DuplicateDate(NaiveDate),
}

/// Validated puzzles, newest first.
#[derive(Debug, Clone, Default)]
pub struct PuzzleCollection {
    puzzles: Vec<Arc<Puzzle>>,
    skipped: usize,
}

impl PuzzleCollection {
    /// Keeps every puzzle that passes validation. A puzzle that fails it, or
    /// that repeats the date of an earlier one, is logged and left out.
    pub fn new(puzzles: Vec<Puzzle>, shape: &PuzzleShape) -> Self {
        let mut dates = HashSet::new();
        let mut skipped = 0;
        let mut kept = Vec::with_capacity(puzzles.len());

        for puzzle in puzzles {
            let rejection = match puzzle.validate(shape) {
                Err(source) => Some(StoreError::InvalidPuzzle {
                    date: puzzle.date,
                    source,
                }),
                Ok(()) if !dates.insert(puzzle.date) => Some(StoreError::DuplicateDate(puzzle.date)),
                Ok(()) => None,
            };
            match rejection {
                Some(error) => {
                    tracing::warn!(id = puzzle.id, date = %puzzle.date, %error, "Skipping puzzle");
                    skipped += 1;
                }
                None => kept.push(Arc::new(puzzle)),
            }
        }

        kept.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            puzzles: kept,
            skipped,
        }
    }

    pub fn latest(&self) -> Option<Arc<Puzzle>> {
        self.puzzles.first().cloned()
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Arc<Puzzle>> {
        self.puzzles.choose(rng).cloned()
    }

    /// Resolves an ISO date, [`LATEST`] or [`RANDOM`]. Keys that are not
    /// dates simply match nothing.
    pub fn lookup(&self, key: &str) -> Option<Arc<Puzzle>> {
        self.lookup_with_rng(key, &mut rand::thread_rng())
    }

    pub fn lookup_with_rng<R: Rng + ?Sized>(&self, key: &str, rng: &mut R) -> Option<Arc<Puzzle>> {
        match key {
            LATEST => self.latest(),
            RANDOM => self.random(rng),
            _ => {
                let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
                self.puzzles
                    .iter()
                    .find(|puzzle| puzzle.date == date)
                    .cloned()
            }
        }
    }

    pub fn all(&self) -> &[Arc<Puzzle>] {
        &self.puzzles
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Puzzles or records dropped while building the collection.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

pub trait PuzzleStore: Send + Sync {
    fn collection(&self) -> Result<Arc<PuzzleCollection>, StoreError>;

    fn get_puzzle(&self, key: &str) -> Result<Option<Arc<Puzzle>>, StoreError> {
        Ok(self.collection()?.lookup(key))
    }

    fn get_all_puzzles(&self) -> Result<Vec<Arc<Puzzle>>, StoreError> {
        Ok(self.collection()?.all().to_vec())
    }

    /// Drops stale cached data, returning `(removed, remaining)`.
    fn cleanup(&self) -> (usize, usize) {
        (0, 0)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    collection: Arc<PuzzleCollection>,
}

impl MemoryStore {
    pub fn new(puzzles: Vec<Puzzle>, shape: &PuzzleShape) -> Self {
        Self {
            collection: Arc::new(PuzzleCollection::new(puzzles, shape)),
        }
    }
}

impl PuzzleStore for MemoryStore {
    fn collection(&self) -> Result<Arc<PuzzleCollection>, StoreError> {
        Ok(self.collection.clone())
    }
}

#[derive(Debug, Deserialize)]
struct PuzzleRecord {
    id: u64,
    date: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    answers: Vec<AnswerRecord>,
}

#[derive(Debug, Deserialize)]
struct AnswerRecord {
    group: String,
    members: Vec<String>,
}

impl PuzzleRecord {
    fn into_puzzle(self) -> Result<Puzzle, StoreError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            StoreError::InvalidDate {
                id: self.id,
                date: self.date.clone(),
            }
        })?;

        Ok(Puzzle {
            id: self.id,
            date,
            title: self
                .title
                .unwrap_or_else(|| format!("Connections Puzzle #{}", self.id)),
            difficulty: self.difficulty.unwrap_or_else(|| "unrated".to_string()),
            categories: self
                .answers
                .into_iter()
                .map(|answer| Category {
                    name: answer.group,
                    members: answer.members,
                })
                .collect(),
        })
    }
}

/// Parses the JSON puzzle archive format: an array of
/// `{ id, date, title?, difficulty?, answers: [{ group, members }] }`.
/// Only a file that is not a JSON array fails; bad records are skipped.
pub fn parse_puzzles(raw: &str, shape: &PuzzleShape) -> Result<PuzzleCollection, StoreError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;

    let mut skipped = 0;
    let mut puzzles = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let parsed = serde_json::from_value::<PuzzleRecord>(record)
            .map_err(|source| StoreError::InvalidRecord { index, source })
            .and_then(PuzzleRecord::into_puzzle);
        match parsed {
            Ok(puzzle) => puzzles.push(puzzle),
            Err(error) => {
                tracing::warn!(index, %error, "Skipping puzzle record");
                skipped += 1;
            }
        }
    }

    let mut collection = PuzzleCollection::new(puzzles, shape);
    collection.skipped += skipped;
    Ok(collection)
}

/// Reads puzzles from a JSON file, keeping the parsed result for `ttl` so
/// that edits to the file show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    shape: PuzzleShape,
    cache: ExpiringCache<PathBuf, PuzzleCollection>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, shape: PuzzleShape, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            shape,
            cache: ExpiringCache::new(ttl),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PuzzleCollection, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_puzzles(&raw, &self.shape)
    }
}

impl PuzzleStore for JsonFileStore {
    fn collection(&self) -> Result<Arc<PuzzleCollection>, StoreError> {
        if let Some(collection) = self.cache.get(&self.path) {
            return Ok(collection);
        }

        let collection = self.load()?;
        tracing::info!(
            path = %self.path.display(),
            puzzles = collection.len(),
            skipped = collection.skipped(),
            "Puzzle data loaded"
        );
        Ok(self.cache.insert(self.path.clone(), collection))
    }

    fn cleanup(&self) -> (usize, usize) {
        self.cache.clean_expired()
    }
}
