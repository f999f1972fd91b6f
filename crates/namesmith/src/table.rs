//! Historical rank table and its artifact loaders.
//!
//! The table maps encoded feature vectors to precomputed ranks. Positive
//! entries are known names with a popularity rank; negative entries are
//! flagged words whose penalty overrides the predictive model. Loaded once
//! at startup and never mutated afterwards, so lookups need no locking.

use crate::{FeatureVector, Gender, HistoricalTable, encode};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Errors raised while loading scoring artifacts from disk.
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid model file {path}: {reason}")]
    InvalidModel { path: String, reason: String },
}

impl ArtifactError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Read-only mapping from [`FeatureVector`] to a signed rank.
#[derive(Default, Debug, Clone)]
pub struct RankTable {
    ranks: HashMap<FeatureVector, f64>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Records a known name's rank under one gender.
    pub fn insert(&mut self, name: &str, gender: Gender, rank: f64) {
        self.ranks.insert(encode(name, gender), rank);
    }

    /// Records a flagged word under both genders. The score is expected to
    /// be negative; it is stored as given.
    pub fn insert_flagged(&mut self, word: &str, score: f64) {
        self.insert(word, Gender::Female, score);
        self.insert(word, Gender::Male, score);
    }

    /// Merges whitespace-separated `name SEX rank` lines. Malformed lines
    /// are skipped. Returns the number of entries added.
    pub fn merge_ranks<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let (Some(name), Some(sex), Some(rank)) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            let Ok(gender) = sex.parse::<Gender>() else {
                continue;
            };
            let Ok(rank) = rank.parse::<f64>() else {
                continue;
            };
            self.insert(name, gender, rank);
            added += 1;
        }
        Ok(added)
    }

    /// Merges tab-separated `word<TAB>score` lines of flagged words, under
    /// both genders. Malformed lines are skipped.
    pub fn merge_flagged<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split('\t');
            let (Some(word), Some(score)) = (parts.next(), parts.next()) else {
                continue;
            };
            let Ok(score) = score.trim().parse::<f64>() else {
                continue;
            };
            self.insert_flagged(word, score);
            added += 1;
        }
        Ok(added)
    }

    pub fn merge_ranks_file(&mut self, path: &Path) -> Result<usize, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
        let added = self
            .merge_ranks(BufReader::new(file))
            .map_err(|e| ArtifactError::io(path, e))?;
        tracing::info!(path = %path.display(), added, "loaded historical ranks");
        Ok(added)
    }

    pub fn merge_flagged_file(&mut self, path: &Path) -> Result<usize, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
        let added = self
            .merge_flagged(BufReader::new(file))
            .map_err(|e| ArtifactError::io(path, e))?;
        tracing::info!(path = %path.display(), added, "loaded flagged words");
        Ok(added)
    }
}

impl HistoricalTable for RankTable {
    fn lookup(&self, features: &FeatureVector) -> Option<f64> {
        self.ranks.get(features).copied()
    }
}
