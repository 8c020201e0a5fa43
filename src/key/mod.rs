//! Canonical structured keys.
//!
//! A [`PathKey`] identifies a location in a nested value. Two surface
//! encodings are equivalent and convertible without loss: a `/`-joined
//! string and an explicit ordered segment list. Normalization here is
//! purely structural; whether a key exists in a schema is decided by
//! [`crate::schema::tree`].

pub mod errors;

pub use errors::{KeyError, KeyResult};

use std::fmt;
use std::str::FromStr;

/// Separator between segments in the joined encoding
pub const SEPARATOR: char = '/';

/// An ordered, non-empty sequence of UTF-8 segments identifying a location
/// in a nested structure.
///
/// Both encodings are kept so that neither direction of the conversion
/// allocates after construction. Segments never contain the separator and
/// are never empty; both are enforced at construction time, which makes the
/// joined/segments round-trip lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    segments: Vec<String>,
    joined: String,
}

impl PathKey {
    /// Normalizes a `/`-joined key string.
    pub fn parse(input: &str) -> KeyResult<Self> {
        if input.is_empty() {
            return Err(KeyError::empty());
        }
        let segments: Vec<String> = input.split(SEPARATOR).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(KeyError::empty_segment(input));
        }
        Ok(Self {
            joined: input.to_owned(),
            segments,
        })
    }

    /// Normalizes an explicit segment list.
    pub fn from_segments<I, S>(segments: I) -> KeyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(KeyError::empty());
        }
        for segment in &segments {
            if segment.is_empty() {
                return Err(KeyError::empty_segment(segments.join("/")));
            }
            if segment.contains(SEPARATOR) {
                return Err(KeyError::separator_in_segment(segment));
            }
        }
        let joined = segments.join(&SEPARATOR.to_string());
        Ok(Self { segments, joined })
    }

    /// The canonical `/`-joined form.
    pub fn joined(&self) -> &str {
        &self.joined
    }

    /// The ordered segment list.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Extends this key with one more segment.
    pub fn child(&self, segment: &str) -> KeyResult<Self> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Self::from_segments(segments)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined)
    }
}

impl FromStr for PathKey {
    type Err = KeyError;

    fn from_str(s: &str) -> KeyResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PathKey {
    type Error = KeyError;

    fn try_from(value: &str) -> KeyResult<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PathKey {
    type Error = KeyError;

    fn try_from(value: String) -> KeyResult<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<Vec<String>> for PathKey {
    type Error = KeyError;

    fn try_from(value: Vec<String>) -> KeyResult<Self> {
        Self::from_segments(value)
    }
}

impl TryFrom<&[&str]> for PathKey {
    type Error = KeyError;

    fn try_from(value: &[&str]) -> KeyResult<Self> {
        Self::from_segments(value.iter().copied())
    }
}

impl<const N: usize> TryFrom<[&str; N]> for PathKey {
    type Error = KeyError;

    fn try_from(value: [&str; N]) -> KeyResult<Self> {
        Self::from_segments(value)
    }
}

impl TryFrom<&PathKey> for PathKey {
    type Error = KeyError;

    fn try_from(value: &PathKey) -> KeyResult<Self> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        let key = PathKey::parse("a").unwrap();
        assert_eq!(key.joined(), "a");
        assert_eq!(key.segments(), ["a"]);
        assert_eq!(key.len(), 1);
    }

    #[test]
    fn test_parse_nested_key() {
        let key = PathKey::parse("b/c/d").unwrap();
        assert_eq!(key.segments(), ["b", "c", "d"]);
        assert_eq!(key.len(), 3);
    }

    #[test]
    fn test_parse_empty_key_fails() {
        assert!(PathKey::parse("").is_err());
    }

    #[test]
    fn test_parse_empty_segment_fails() {
        assert!(PathKey::parse("a//b").is_err());
        assert!(PathKey::parse("/a").is_err());
        assert!(PathKey::parse("a/").is_err());
    }

    #[test]
    fn test_from_segments() {
        let key = PathKey::from_segments(["b", "c"]).unwrap();
        assert_eq!(key.joined(), "b/c");
    }

    #[test]
    fn test_from_empty_list_fails() {
        assert!(PathKey::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_segment_with_separator_fails() {
        let result = PathKey::from_segments(["a", "b/c"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip() {
        let segments = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let key = PathKey::from_segments(segments.clone()).unwrap();
        let reparsed = PathKey::parse(key.joined()).unwrap();
        assert_eq!(reparsed.segments(), segments.as_slice());
        assert_eq!(reparsed, key);
    }

    #[test]
    fn test_child() {
        let key = PathKey::parse("a").unwrap();
        assert_eq!(key.child("b").unwrap().joined(), "a/b");
        assert!(key.child("b/c").is_err());
    }

    #[test]
    fn test_try_from_encodings_agree() {
        let from_str: PathKey = "b/c".try_into().unwrap();
        let from_list: PathKey = ["b", "c"].try_into().unwrap();
        assert_eq!(from_str, from_list);
    }
}
