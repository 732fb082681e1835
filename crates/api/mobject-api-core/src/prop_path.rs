//! PropPath parsing and formatting.
//!
//! A PropPath addresses one field inside a nested property graph. Segments
//! are either plain attributes or bracketed indices:
//!   `modifiers["Array"].count` -> [Attr("modifiers"), Index(Name("Array")), Attr("count")]
//!   `location[1]`              -> [Attr("location"), Index(Element(1))]
//!
//! The rendered string is the external channel-address format of the
//! timeline host: attribute segments joined with '.', numeric brackets bare
//! (`[3]`), string brackets double-quoted (`["Name"]`). The round-trip
//! `parse_channel_address(p.to_channel_address()) == p` is exact for every
//! valid path.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PathError;

/// Key of a bracketed index segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// String-keyed lookup, rendered quoted: `["Array"]`
    Name(String),
    /// Positional lookup, rendered bare: `[3]`
    Element(usize),
}

/// One path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSeg {
    /// Attribute access by member name.
    Attr(String),
    /// Keyed or positional container access.
    Index(IndexKey),
}

/// An ordered, immutable sequence of path segments. Only the last segment
/// may address a leaf scalar/vector field; intermediate segments must
/// resolve to containers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropPath {
    segs: Vec<PathSeg>,
}

impl PropPath {
    pub fn new(segs: Vec<PathSeg>) -> Result<Self, PathError> {
        if segs.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { segs })
    }

    /// Single-attribute path, the common case (`location`, `hide_render`).
    pub fn attr(name: impl Into<String>) -> Self {
        Self {
            segs: vec![PathSeg::Attr(name.into())],
        }
    }

    pub fn segments(&self) -> &[PathSeg] {
        &self.segs
    }

    /// New path with a trailing positional index (vector component access).
    pub fn with_element(&self, index: usize) -> Self {
        let mut segs = self.segs.clone();
        segs.push(PathSeg::Index(IndexKey::Element(index)));
        Self { segs }
    }

    /// Split a trailing `Element` off the path. Returns the remaining path
    /// and the component index, or `(self, None)` when the path does not
    /// end in a positional index.
    pub fn component_split(&self) -> (PropPath, Option<u32>) {
        match self.segs.split_last() {
            Some((PathSeg::Index(IndexKey::Element(i)), rest)) if !rest.is_empty() => (
                PropPath {
                    segs: rest.to_vec(),
                },
                Some(*i as u32),
            ),
            _ => (self.clone(), None),
        }
    }

    /// Render to the host channel-address string.
    pub fn to_channel_address(&self) -> String {
        let mut out = String::new();
        for (i, seg) in self.segs.iter().enumerate() {
            match seg {
                PathSeg::Attr(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSeg::Index(IndexKey::Element(n)) => {
                    out.push('[');
                    out.push_str(&n.to_string());
                    out.push(']');
                }
                PathSeg::Index(IndexKey::Name(key)) => {
                    out.push_str("[\"");
                    out.push_str(key);
                    out.push_str("\"]");
                }
            }
        }
        out
    }

    /// Parse a host channel-address string back into a structured path.
    pub fn parse_channel_address(address: &str) -> Result<Self, PathError> {
        let err = || PathError::ParseAddress {
            address: address.to_string(),
        };
        if address.is_empty() {
            return Err(err());
        }

        let mut segs: Vec<PathSeg> = Vec::new();
        let bytes = address.as_bytes();
        let mut pos = 0usize;
        // A '.' is only legal between an attribute/bracket and an attribute.
        let mut expect_attr = true;

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    if segs.is_empty() || expect_attr {
                        return Err(err());
                    }
                    pos += 1;
                    expect_attr = true;
                }
                b'[' => {
                    if expect_attr && !segs.is_empty() {
                        // `a.[0]` is malformed
                        return Err(err());
                    }
                    let close = address[pos..].find(']').ok_or_else(err)? + pos;
                    let inner = &address[pos + 1..close];
                    let key = if let Some(quoted) = inner
                        .strip_prefix('"')
                        .and_then(|s| s.strip_suffix('"'))
                    {
                        IndexKey::Name(quoted.to_string())
                    } else if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
                        IndexKey::Element(inner.parse().map_err(|_| err())?)
                    } else {
                        return Err(err());
                    };
                    segs.push(PathSeg::Index(key));
                    pos = close + 1;
                    expect_attr = false;
                }
                _ => {
                    if !expect_attr && !segs.is_empty() {
                        return Err(err());
                    }
                    let end = address[pos..]
                        .find(|c| c == '.' || c == '[')
                        .map(|off| pos + off)
                        .unwrap_or(bytes.len());
                    let name = &address[pos..end];
                    if name.is_empty() {
                        return Err(err());
                    }
                    segs.push(PathSeg::Attr(name.to_string()));
                    pos = end;
                    expect_attr = false;
                }
            }
        }
        if expect_attr && !segs.is_empty() {
            // trailing '.'
            return Err(err());
        }
        PropPath::new(segs)
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_channel_address())
    }
}

impl FromStr for PropPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropPath::parse_channel_address(s)
    }
}

// Serde support: serialize as the channel-address string.
impl Serialize for PropPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_channel_address())
    }
}

impl<'de> Deserialize<'de> for PropPath {
    fn deserialize<D>(deserializer: D) -> Result<PropPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropPath::parse_channel_address(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(addr: &str) {
        let p = PropPath::parse_channel_address(addr).unwrap();
        assert_eq!(p.to_channel_address(), addr);
        assert_eq!(PropPath::parse_channel_address(&p.to_channel_address()).unwrap(), p);
    }

    #[test]
    fn parse_simple_attr() {
        let p = PropPath::parse_channel_address("location").unwrap();
        assert_eq!(p.segments(), &[PathSeg::Attr("location".into())]);
    }

    #[test]
    fn parse_nested_with_keys() {
        let p = PropPath::parse_channel_address("modifiers[\"Array\"].count").unwrap();
        assert_eq!(
            p.segments(),
            &[
                PathSeg::Attr("modifiers".into()),
                PathSeg::Index(IndexKey::Name("Array".into())),
                PathSeg::Attr("count".into()),
            ]
        );
    }

    #[test]
    fn parse_component_index() {
        let p = PropPath::parse_channel_address("location[1]").unwrap();
        assert_eq!(
            p.segments(),
            &[
                PathSeg::Attr("location".into()),
                PathSeg::Index(IndexKey::Element(1)),
            ]
        );
    }

    #[test]
    fn roundtrip_is_exact() {
        roundtrip("location");
        roundtrip("location[2]");
        roundtrip("modifiers[\"Array\"].count");
        roundtrip("key_blocks[\"Smile\"].value");
        roundtrip("nodes[\"Mix\"].inputs[0].default_value");
    }

    #[test]
    fn numeric_brackets_stay_bare_and_strings_stay_quoted() {
        let p = PropPath::parse_channel_address("bones[\"07\"].tail[0]").unwrap();
        // "07" is quoted, so it is a Name even though it is all digits.
        assert_eq!(
            p.segments()[1],
            PathSeg::Index(IndexKey::Name("07".into()))
        );
        assert_eq!(p.to_channel_address(), "bones[\"07\"].tail[0]");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", ".", "a..b", "a.[0]", "a[", "a[]", "a[x]", "a.", "a[0]b"] {
            assert!(
                PropPath::parse_channel_address(bad).is_err(),
                "expected parse failure for '{bad}'"
            );
        }
    }

    #[test]
    fn component_split_peels_trailing_element() {
        let p = PropPath::parse_channel_address("location[1]").unwrap();
        let (base, idx) = p.component_split();
        assert_eq!(base.to_channel_address(), "location");
        assert_eq!(idx, Some(1));

        let p = PropPath::parse_channel_address("modifiers[\"Array\"].count").unwrap();
        let (base, idx) = p.component_split();
        assert_eq!(base, p);
        assert_eq!(idx, None);
    }
}
