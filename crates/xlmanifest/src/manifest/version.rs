//! Four-component manifest version numbers

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A `major.minor.build.revision` version as carried in manifest
/// documents.
///
/// All four components are required on the wire; ordering is
/// lexicographic over the components, so `1.2.0.0 < 1.10.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManifestVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Build component
    pub build: u32,
    /// Revision component
    pub revision: u32,
}

impl ManifestVersion {
    /// Construct a version from its four components.
    #[must_use]
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

/// Failure to parse a version string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid major.minor.build.revision version")]
pub struct ParseVersionError {
    /// The rejected input
    pub input: String,
}

impl FromStr for ManifestVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || ParseVersionError {
            input: s.to_string(),
        };

        let mut components = s.split('.');
        let mut next = || -> Result<u32, ParseVersionError> {
            components
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(fail)
        };

        let version = Self {
            major: next()?,
            minor: next()?,
            build: next()?,
            revision: next()?,
        };
        if components.next().is_some() {
            return Err(fail());
        }
        Ok(version)
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

// On the wire a version is a single dotted string, not a struct.
impl Serialize for ManifestVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ManifestVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
