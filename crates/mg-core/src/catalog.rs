//! Migration catalog: discovery and creation of migration pairs.
//!
//! The catalog is the validated, version-sorted set of pairs found in one
//! migration directory. Every problem with the directory (malformed names,
//! half pairs, duplicates) is reported here, before any database work.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Direction, MigrationFile, MigrationPair};
use crate::version::Version;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::{Path, PathBuf};

/// Validated set of migration pairs in one directory
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    extension: String,
    pairs: BTreeMap<Version, MigrationPair>,
}

#[derive(Default)]
struct PartialPair {
    up: Option<MigrationFile>,
    down: Option<MigrationFile>,
}

impl Catalog {
    /// Scan `dir` for migration files with the given extension.
    pub fn scan(dir: &Path, extension: &str) -> CoreResult<Self> {
        if !dir.is_dir() {
            return Err(CoreError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut paths = Vec::new();
        let entries = fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        // Stable order so duplicate/mismatch errors name files deterministically
        paths.sort();

        let mut partial: BTreeMap<Version, PartialPair> = BTreeMap::new();
        for path in &paths {
            let Some(file) = MigrationFile::parse(path, extension)? else {
                continue;
            };
            if file.version.is_zero() {
                return Err(CoreError::InvalidFileName {
                    file: file.file_name,
                    reason: "version 0 is reserved for the empty schema".to_string(),
                });
            }

            let slot = partial.entry(file.version).or_default();
            let existing = match file.direction {
                Direction::Up => &mut slot.up,
                Direction::Down => &mut slot.down,
            };
            if let Some(first) = existing {
                return Err(CoreError::DuplicateVersion {
                    version: file.version,
                    direction: file.direction,
                    first: first.file_name.clone(),
                    second: file.file_name,
                });
            }
            *existing = Some(file);
        }

        let mut pairs = BTreeMap::new();
        for (version, slot) in partial {
            let pair = match (slot.up, slot.down) {
                (Some(up), Some(down)) => {
                    if up.name != down.name {
                        return Err(CoreError::PairNameMismatch {
                            version,
                            up: up.file_name,
                            down: down.file_name,
                        });
                    }
                    MigrationPair {
                        version,
                        name: up.name.clone(),
                        up,
                        down,
                    }
                }
                (Some(up), None) => {
                    return Err(CoreError::IncompletePair {
                        version,
                        missing: Direction::Down,
                        present: up.file_name,
                    })
                }
                (None, Some(down)) => {
                    return Err(CoreError::IncompletePair {
                        version,
                        missing: Direction::Up,
                        present: down.file_name,
                    })
                }
                (None, None) => continue,
            };
            pairs.insert(version, pair);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
            pairs,
        })
    }

    /// Build a catalog from already-validated pairs.
    pub fn from_pairs(
        dir: impl Into<PathBuf>,
        extension: &str,
        pairs: impl IntoIterator<Item = MigrationPair>,
    ) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.to_string(),
            pairs: pairs.into_iter().map(|p| (p.version, p)).collect(),
        }
    }

    /// Directory this catalog was read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Migration file extension (without the dot)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the directory holds no migrations
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in ascending version order
    pub fn pairs(&self) -> impl DoubleEndedIterator<Item = &MigrationPair> {
        self.pairs.values()
    }

    /// Look up one version
    pub fn get(&self, version: Version) -> Option<&MigrationPair> {
        self.pairs.get(&version)
    }

    /// Highest version in the catalog, or 0 when empty
    pub fn latest_version(&self) -> Version {
        self.pairs
            .keys()
            .next_back()
            .copied()
            .unwrap_or(Version::ZERO)
    }

    /// Highest catalog version strictly below `version`, or 0.
    ///
    /// This is the schema state left behind after reverting `version`.
    pub fn previous_version(&self, version: Version) -> Version {
        self.pairs
            .range(..version)
            .next_back()
            .map(|(v, _)| *v)
            .unwrap_or(Version::ZERO)
    }

    /// Up files with version greater than `current`, ascending.
    pub fn pending_up(&self, current: Version) -> impl Iterator<Item = &MigrationFile> {
        self.pairs
            .range((Bound::Excluded(current), Bound::Unbounded))
            .map(|(_, pair)| &pair.up)
    }

    /// Down files with version at most `current`, descending.
    pub fn applied_down(&self, current: Version) -> impl Iterator<Item = &MigrationFile> {
        self.pairs
            .range(..=current)
            .rev()
            .map(|(_, pair)| &pair.down)
    }

    /// Create an empty up/down pair named `name` in `dir`.
    ///
    /// The new version is the current UTC time as `YYYYMMDDHHMMSS`, bumped past
    /// the highest existing version when the clock has not moved far enough.
    pub fn create(dir: &Path, name: &str, extension: &str) -> CoreResult<MigrationPair> {
        Self::create_at(dir, name, extension, Utc::now())
    }

    /// [`Catalog::create`] with an explicit clock reading.
    pub fn create_at(
        dir: &Path,
        name: &str,
        extension: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<MigrationPair> {
        let name = normalize_name(name)?;

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        let existing = Self::scan(dir, extension)?;
        let version = timestamp_version(now).max(existing.latest_version().next());

        let up = write_empty(dir, version, &name, Direction::Up, extension)?;
        let down = match write_empty(dir, version, &name, Direction::Down, extension) {
            Ok(down) => down,
            Err(e) => {
                let _ = fs::remove_file(&up.path);
                return Err(e);
            }
        };

        Ok(MigrationPair {
            version,
            name,
            up,
            down,
        })
    }
}

/// `YYYYMMDDHHMMSS` as a number.
fn timestamp_version(now: DateTime<Utc>) -> Version {
    let year = u64::try_from(now.year()).unwrap_or(0);
    Version::new(
        year * 10_000_000_000
            + u64::from(now.month()) * 100_000_000
            + u64::from(now.day()) * 1_000_000
            + u64::from(now.hour()) * 10_000
            + u64::from(now.minute()) * 100
            + u64::from(now.second()),
    )
}

/// Turn a user-supplied name into the file-name segment.
fn normalize_name(name: &str) -> CoreResult<String> {
    let normalized = name.split_whitespace().collect::<Vec<_>>().join("_");
    if normalized.is_empty() {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if let Some(bad) = normalized
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: format!("character '{bad}' is not allowed"),
        });
    }
    if normalized.starts_with('.') {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "name must not start with '.'".to_string(),
        });
    }
    Ok(normalized)
}

fn write_empty(
    dir: &Path,
    version: Version,
    name: &str,
    direction: Direction,
    extension: &str,
) -> CoreResult<MigrationFile> {
    let file_name = MigrationFile::file_name_for(version, name, direction, extension);
    let path = dir.join(&file_name);
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(MigrationFile {
        version,
        direction,
        name: name.to_string(),
        file_name,
        path,
    })
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
