// release version parsing

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// grammar of a release version as written in changelog headers
pub const VERSION_PATTERN: &str = r"\d+\.\d+\.\d+(?:[a-z]+\d+)?";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:([a-z]+)(\d+))?$").expect("version regex is valid")
});

/// a released version such as `1.4.2` or `2.0.0b3`
///
/// ordering follows the usual precedence rules: numeric components first,
/// then the pre-release tag (a < b < rc), then its number. a version without
/// a pre-release tag is newer than any pre-release of the same numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(semver::Version);

fn parse_component(input: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| Error::VersionParse {
        input: input.to_string(),
        reason: format!("component '{}' is out of range", value),
    })
}

impl FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let caps = VERSION_RE
            .captures(input.trim())
            .ok_or_else(|| Error::VersionParse {
                input: input.to_string(),
                reason: "expected <major>.<minor>.<patch>[<tag><number>]".to_string(),
            })?;

        let mut version = semver::Version::new(
            parse_component(input, &caps[1])?,
            parse_component(input, &caps[2])?,
            parse_component(input, &caps[3])?,
        );

        if let (Some(tag), Some(number)) = (caps.get(4), caps.get(5)) {
            // numeric identifiers compare numerically, so `b10` sorts after `b2`
            let number = parse_component(input, number.as_str())?;
            version.pre = semver::Prerelease::new(&format!("{}.{}", tag.as_str(), number))
                .map_err(|e| Error::VersionParse {
                    input: input.to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Self(version))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)?;
        if let Some((tag, number)) = self.0.pre.as_str().split_once('.') {
            write!(f, "{}{}", tag, number)?;
        }
        Ok(())
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// a `<major>.<minor>` release branch name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub name: String,
    pub series: semver::Version,
}

impl ReleaseBranch {
    /// parse a branch name, returning `None` for anything that is not `<major>.<minor>`
    pub fn from_name(name: &str) -> Option<Self> {
        let (major, minor) = name.split_once('.')?;
        if major.is_empty()
            || minor.is_empty()
            || !major.chars().all(|c| c.is_ascii_digit())
            || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            series: semver::Version::new(major.parse().ok()?, minor.parse().ok()?, 0),
        })
    }
}

/// keep release branches only and order them newest series first
pub fn select_release_branches<I, S>(names: I) -> Vec<ReleaseBranch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut branches: Vec<ReleaseBranch> = names
        .into_iter()
        .filter_map(|n| ReleaseBranch::from_name(n.as_ref()))
        .collect();
    branches.sort_by(|a, b| b.series.cmp(&a.series));
    branches.dedup_by(|a, b| a.series == b.series);
    branches
}
