//! Schema version numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A schema state identifier.
///
/// Versions are totally ordered and compared numerically. [`Version::ZERO`]
/// means no migration has been applied.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// The empty schema.
    pub const ZERO: Version = Version(0);

    /// Wrap a raw version number.
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// The raw version number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is version 0.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The next version up.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Signed distance from `self` to `target`, saturating at the `i64` range.
    pub fn delta_to(self, target: Version) -> i64 {
        let delta = i128::from(target.0) - i128::from(self.0);
        i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX })
    }
}

impl From<u64> for Version {
    fn from(version: u64) -> Self {
        Self(version)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl TryFrom<i64> for Version {
    type Error = std::num::TryFromIntError;

    fn try_from(version: i64) -> Result<Self, Self::Error> {
        u64::try_from(version).map(Self)
    }
}

impl FromStr for Version {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
