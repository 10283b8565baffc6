//! Dependency versions.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A dotted numeric version such as `1.2.10`, with an optional pre-release
/// (`5.0.0-beta1`, `1.0rc1`) and optional build metadata (`1.0.0+build`).
///
/// Segments compare numerically and trailing zeros are insignificant, so
/// `1.9 < 1.10` and `1.0 == 1.0.0`. A pre-release sorts below the release it
/// precedes, and build metadata never affects ordering. The original spelling
/// is kept for display and for asset paths.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<u64>,
    pre: Vec<PreId>,
}

/// One run of a pre-release tag: `rc1` is `[Alpha("rc"), Num(1)]`.
///
/// Numeric runs sort below alphabetic ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PreId {
    Num(u64),
    Alpha(String),
}

impl Version {
    pub fn parse(raw: &str) -> Result<Version> {
        let invalid = || Error::InvalidVersion {
            version: raw.to_string(),
        };
        let trimmed = raw.trim();

        let (rest, build) = match trimmed.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (trimmed, None),
        };
        if let Some(build) = build {
            let valid = build.split('.').all(|id| {
                !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            });
            if !valid {
                return Err(invalid());
            }
        }

        // `1.0-rc1`, or a tag glued onto the last segment as in `1.0rc1`
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => match rest.find(|c: char| c.is_ascii_alphabetic()) {
                Some(i) if rest[..i].ends_with(|c: char| c.is_ascii_digit()) => {
                    (&rest[..i], Some(&rest[i..]))
                }
                _ => (rest, None),
            },
        };
        if core.is_empty() {
            return Err(invalid());
        }

        let segments = core
            .split('.')
            .map(|s| s.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;
        let pre = match pre {
            Some(pre) => parse_pre(pre).ok_or_else(invalid)?,
            None => Vec::new(),
        };

        Ok(Version {
            raw: trimmed.to_string(),
            segments,
            pre,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Whether this version carries a pre-release tag.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    fn significant(&self) -> &[u64] {
        let end = self
            .segments
            .iter()
            .rposition(|&s| s != 0)
            .map_or(0, |i| i + 1);
        &self.segments[..end]
    }
}

/// Split a pre-release tag into alternating letter and digit runs.
/// Identifiers are separated by `.` or `-` and must be ASCII alphanumeric.
fn parse_pre(pre: &str) -> Option<Vec<PreId>> {
    let mut ids = Vec::new();
    for piece in pre.split(['.', '-']) {
        if piece.is_empty() || !piece.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let mut rest = piece;
        while let Some(first) = rest.chars().next() {
            let digits = first.is_ascii_digit();
            let end = rest
                .find(|c: char| c.is_ascii_digit() != digits)
                .unwrap_or(rest.len());
            let (run, tail) = rest.split_at(end);
            ids.push(if digits {
                PreId::Num(run.parse().ok()?)
            } else {
                PreId::Alpha(run.to_ascii_lowercase())
            });
            rest = tail;
        }
    }
    Some(ids)
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant()
            .cmp(other.significant())
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
        self.pre.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
