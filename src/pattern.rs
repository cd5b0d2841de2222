use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::PatternOffset;
use crate::parse_rle;
use crate::parse_rle::RleError;
use crate::rule_set::B3S23;
use crate::rule_set::RuleSet;

/// The demo's default seed. On the 10x10 torus it dies out after 63 generations.
pub const SEED: [(PatternOffset, PatternOffset); 6] =
    [(2, 2), (3, 2), (4, 2), (4, 3), (4, 4), (3, 5)];

/// A glider heading towards the bottom right, one cell every four generations.
pub const GLIDER: [(PatternOffset, PatternOffset); 5] = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid RLE: {0}")]
    Rle(#[from] RleError),

    #[error("Only B3/S23 patterns are supported, found {rule}")]
    UnsupportedRule { rule: RuleSet },
}

/// A set of live cells, as `(row, column)` pairs, used once to seed the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub name: Option<String>,
    cells: Vec<(PatternOffset, PatternOffset)>,
}

impl Pattern {
    pub fn new(name: Option<String>, cells: Vec<(PatternOffset, PatternOffset)>) -> Self {
        Self { name, cells }
    }

    pub fn seed() -> Self {
        Self::new(Some("Seed".to_string()), SEED.to_vec())
    }

    pub fn glider() -> Self {
        Self::new(Some("Glider".to_string()), GLIDER.to_vec())
    }

    pub fn cells(&self) -> &[(PatternOffset, PatternOffset)] {
        &self.cells
    }

    /// Parse an RLE pattern. Patterns written for any rule other than Conway's are rejected.
    pub fn from_rle(bytes: &[u8]) -> Result<Self, PatternError> {
        let mut cells = Vec::new();
        let file = parse_rle::read_rle(bytes, |row, column| cells.push((row, column)))?;

        if file.set != B3S23 {
            return Err(PatternError::UnsupportedRule { rule: file.set });
        }

        let name = file
            .name
            .map(|name| String::from_utf8_lossy(name).into_owned());

        Ok(Self::new(name, cells))
    }

    /// Read and parse an RLE file
    pub fn load(path: &Path) -> Result<Self, PatternError> {
        let bytes = fs::read(path).map_err(|source| PatternError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let pattern = Self::from_rle(&bytes)?;

        info!(
            path = %path.display(),
            name = pattern.name.as_deref().unwrap_or("unnamed"),
            cells = pattern.cells.len(),
            "Loaded pattern"
        );

        Ok(pattern)
    }
}
