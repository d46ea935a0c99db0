//! Field-path parsing.
//!
//! A path is a dot-separated list of segments. Each segment is either a bare
//! key (`facilities`) or a key followed by one non-negative integer index
//! (`parties[0]`). Anything else between brackets (`a[-1]`, `a[x]`, `a[]`)
//! makes the whole segment a literal key.

use std::fmt;

/// One step of a parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Look up `key` in a mapping.
    Key(String),
    /// Look up `key` in a mapping, then element `index` of that sequence.
    Index { key: String, index: usize },
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match Self::split_index(raw) {
            Some((key, index)) => Segment::Index {
                key: key.to_string(),
                index,
            },
            None => Segment::Key(raw.to_string()),
        }
    }

    /// Split `key[n]` into `(key, n)`. Only plain ASCII digits count as an
    /// index; `usize::from_str` alone would also accept a leading `+`.
    fn split_index(raw: &str) -> Option<(&str, usize)> {
        let body = raw.strip_suffix(']')?;
        let open = body.find('[')?;
        let (key, digits) = (&body[..open], &body[open + 1..]);
        if key.is_empty() || key.contains(']') {
            return None;
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(|index| (key, index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index { key, index } => write!(f, "{key}[{index}]"),
        }
    }
}

/// A parsed field path. Never empty: `""` parses to a single empty key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(Segment::parse).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldPath, Segment};

    fn key(k: &str) -> Segment {
        Segment::Key(k.to_string())
    }

    fn idx(k: &str, i: usize) -> Segment {
        Segment::Index { key: k.to_string(), index: i }
    }

    #[test]
    fn single_segment_path() {
        assert_eq!(FieldPath::parse("facilities").segments(), &[key("facilities")]);
    }

    #[test]
    fn mixed_segments() {
        let path = FieldPath::parse("parties[0].contacts[12].email");
        assert_eq!(
            path.segments(),
            &[idx("parties", 0), idx("contacts", 12), key("email")]
        );
    }

    #[test]
    fn non_numeric_or_negative_brackets_are_literal_keys() {
        for raw in ["a[-1]", "a[x]", "a[]", "a[+1]", "a[1.5]", "[3]", "a[1]]", "a[ 1]"] {
            assert_eq!(
                FieldPath::parse(raw).segments(),
                &[key(raw)],
                "{raw} should be a literal key"
            );
        }
    }

    #[test]
    fn empty_path_is_one_empty_key() {
        assert_eq!(FieldPath::parse("").segments(), &[key("")]);
    }

    #[test]
    fn display_round_trips() {
        let raw = "deal.parties[2].name";
        assert_eq!(FieldPath::parse(raw).to_string(), raw);
    }
}
