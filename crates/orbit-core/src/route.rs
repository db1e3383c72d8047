//! Route template parsing and location matching
//!
//! Route patterns are `/`-delimited templates:
//! ```text
//! home
//! user/:id
//! user/:id/settings
//! ```
//!
//! Segments starting with `:` are parameters. Matching is exact-arity with
//! first-segment (module) dispatch: a pattern matches a location only when
//! both have the same number of segments, the first segments are equal, and
//! every literal segment equals the corresponding path segment. Parameter
//! segments bind positionally.

use crate::payload::Payload;
use crate::{Error, Result};

/// A parsed route template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<String>,
}

impl RoutePattern {
    /// Parse a route template string. A leading or trailing `/` is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidPattern("empty pattern".to_string()));
        }

        let segments: Vec<String> = trimmed.split('/').map(|s| s.to_string()).collect();

        for seg in &segments {
            if seg.is_empty() {
                return Err(Error::InvalidPattern(format!("empty segment in pattern: {}", s)));
            }
            if seg == ":" {
                return Err(Error::InvalidPattern(format!("unnamed parameter in pattern: {}", s)));
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    /// Get the normalized pattern string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the pattern segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the module id (first segment)
    pub fn module(&self) -> &str {
        &self.segments[0]
    }

    /// Number of segments in the template
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check if this pattern matches a location: same module, same arity,
    /// every literal segment equal. Parameter segments match anything.
    pub fn matches(&self, location: &Location) -> bool {
        if self.segments.len() != location.segment_count() {
            return false;
        }
        if self.module() != location.module() {
            return false;
        }

        self.segments
            .iter()
            .zip(location.segments())
            .skip(1)
            .all(|(pat, seg)| pat.starts_with(':') || pat == seg)
    }

    /// Extract positional `:param` bindings from a location.
    ///
    /// The caller is expected to have checked [`matches`](Self::matches); on
    /// an arity mismatch the shorter of the two drives extraction.
    pub fn extract(&self, location: &Location) -> Payload {
        let mut payload = Payload::new();

        for (pat, seg) in self.segments.iter().zip(location.segments()).skip(1) {
            if let Some(name) = pat.strip_prefix(':') {
                payload.insert(name, seg);
            }
        }

        payload
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl TryFrom<&str> for RoutePattern {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        RoutePattern::parse(s)
    }
}

/// A parsed location path, split into a leading module segment and the
/// remaining parameter segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    raw: String,
    segments: Vec<String>,
}

impl Location {
    /// Parse a location path such as `/dashboard/42`. The leading empty
    /// segment produced by the leading `/` is discarded.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidLocation("empty location".to_string()));
        }

        let segments: Vec<String> = trimmed.split('/').map(|s| s.to_string()).collect();

        for seg in &segments {
            if seg.is_empty() {
                return Err(Error::InvalidLocation(format!("empty segment in location: {}", path)));
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    /// Get the normalized location string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the location segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the module id (first segment)
    pub fn module(&self) -> &str {
        &self.segments[0]
    }

    /// Remaining segments after the module id
    pub fn params(&self) -> &[String] {
        &self.segments[1..]
    }

    /// Number of segments in the original path
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl TryFrom<&str> for Location {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Location::parse(s)
    }
}
