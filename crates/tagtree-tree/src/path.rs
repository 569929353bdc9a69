//! Index paths for addressing nested fields
//!
//! Provides [`IndexPath`], an ordered list of positions through nested
//! child collections. Its text form is the dotted address used by the
//! schema editor rows (`"2.0.1"`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Position of a node inside nested collections
///
/// The first segment indexes the root collection, each following segment
/// indexes the children of the node reached so far.
///
/// # Examples
/// - `[2]` → `2`, the third root field
/// - `[2, 0, 1]` → `2.0.1`
///
/// A path is only meaningful against the exact collection it was computed
/// from. Any insertion or removal at an ancestor level invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath(Vec<usize>);

impl IndexPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<usize>) -> Self {
        Self(segments)
    }

    /// Path to a root-level element
    #[inline]
    #[must_use]
    pub fn single(index: usize) -> Self {
        Self(vec![index])
    }

    /// Empty path (addresses the root collection itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth (number of segments)
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the containing node, `None` for root-level and root paths
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Index within the immediate parent collection
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(index);
        new
    }

    /// Same parent, different position
    #[inline]
    #[must_use]
    pub fn sibling(&self, index: usize) -> Option<Self> {
        let (_, parents) = self.0.split_last()?;
        let mut segments = parents.to_vec();
        segments.push(index);
        Some(Self(segments))
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Check if this path is an ancestor of another (strict prefix)
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl Display for IndexPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for IndexPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else {
                    seg.parse::<usize>()
                        .map_err(|_| PathError::InvalidSegment(seg.to_string()))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<usize>> for IndexPath {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl From<&[usize]> for IndexPath {
    fn from(segments: &[usize]) -> Self {
        Self(segments.to_vec())
    }
}

impl Serialize for IndexPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IndexPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors related to index paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment is not a non-negative integer
    #[error("invalid segment: {0} (must be a non-negative integer)")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_new_and_segments() {
        let path = IndexPath::new(vec![2, 0]);
        assert_eq!(path.segments(), &[2, 0]);
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn path_root() {
        let path = IndexPath::root();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn path_parent() {
        let path: IndexPath = "3.1.0".parse().unwrap();
        assert_eq!(path.parent().unwrap().segments(), &[3, 1]);
        assert!(IndexPath::single(4).parent().is_none());
    }

    #[test]
    fn path_child_and_sibling() {
        let path = IndexPath::single(2).child(0);
        assert_eq!(path.to_string(), "2.0");
        assert_eq!(path.sibling(1).unwrap().to_string(), "2.1");
        assert!(IndexPath::root().sibling(1).is_none());
    }

    #[test]
    fn path_prefix_and_ancestor() {
        let a: IndexPath = "2".parse().unwrap();
        let b: IndexPath = "2.0".parse().unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(a.is_ancestor_of(&b));
        assert!(!b.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));

        // 1 is not a prefix of 12
        let c: IndexPath = "12".parse().unwrap();
        assert!(!IndexPath::single(1).is_prefix_of(&c));
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<IndexPath, _> = "2..1".parse();
        assert_eq!(result, Err(PathError::EmptySegment));
    }

    #[test]
    fn path_from_str_invalid() {
        let result: Result<IndexPath, _> = "2.x".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(s)) if s == "x"));

        let negative: Result<IndexPath, _> = "-1".parse();
        assert!(negative.is_err());
    }

    #[test]
    fn path_display_round_trip() {
        let path: IndexPath = "3.1.0".parse().unwrap();
        assert_eq!(path.to_string(), "3.1.0");
        assert_eq!(path.iter().collect::<Vec<_>>(), vec![3, 1, 0]);
    }
}
