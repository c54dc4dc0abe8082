//! Migration file model and file name parsing
//!
//! A migration is a pair of files sharing one version and one name:
//! `<version>_<name>.up.<ext>` and `<version>_<name>.down.<ext>`.

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Which way a migration file moves the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply forward
    Up,
    /// Revert
    Down,
}

impl Direction {
    /// The marker used in file names (`up` / `down`).
    pub fn marker(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// The other direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// One migration file on disk.
///
/// The file content is never read here; drivers load and execute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Schema version this file belongs to
    pub version: Version,
    /// Up or down
    pub direction: Direction,
    /// Free-form name shared by both files of the pair
    pub name: String,
    /// Bare file name, e.g. `20230101000000_add_users.up.sql`
    pub file_name: String,
    /// Full path to the file
    pub path: PathBuf,
}

fn stem_pattern() -> &'static Regex {
    static STEM: OnceLock<Regex> = OnceLock::new();
    STEM.get_or_init(|| Regex::new(r"^(\d+)_(.+)\.(up|down)$").expect("valid regex literal"))
}

impl MigrationFile {
    /// Build the canonical file name for a version, name, direction and extension.
    pub fn file_name_for(
        version: Version,
        name: &str,
        direction: Direction,
        extension: &str,
    ) -> String {
        format!("{}_{}.{}.{}", version, name, direction.marker(), extension)
    }

    /// Parse a file in a migration directory.
    ///
    /// Returns `Ok(None)` for files that are not migrations for this
    /// `extension` (hidden files, other extensions). A file with the right
    /// extension whose name does not parse is an error.
    pub fn parse(path: &Path, extension: &str) -> CoreResult<Option<Self>> {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(CoreError::InvalidFileName {
                file: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            });
        };

        if file_name.starts_with('.') {
            return Ok(None);
        }

        let suffix = format!(".{extension}");
        let Some(stem) = file_name.strip_suffix(&suffix) else {
            return Ok(None);
        };

        let caps = stem_pattern()
            .captures(stem)
            .ok_or_else(|| CoreError::InvalidFileName {
                file: file_name.to_string(),
                reason: format!("expected <version>_<name>.<up|down>.{extension}"),
            })?;

        let version: Version = caps[1].parse().map_err(|e| CoreError::InvalidFileName {
            file: file_name.to_string(),
            reason: format!("version '{}' is not a number: {e}", &caps[1]),
        })?;
        let direction = if &caps[3] == "up" {
            Direction::Up
        } else {
            Direction::Down
        };

        Ok(Some(Self {
            version,
            direction,
            name: caps[2].to_string(),
            file_name: file_name.to_string(),
            path: path.to_path_buf(),
        }))
    }
}

impl fmt::Display for MigrationFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)
    }
}

/// The up and down files of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPair {
    /// Shared version
    pub version: Version,
    /// Shared name
    pub name: String,
    /// Forward file
    pub up: MigrationFile,
    /// Revert file
    pub down: MigrationFile,
}

impl MigrationPair {
    /// The file for `direction`.
    pub fn file(&self, direction: Direction) -> &MigrationFile {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
