//! Anchors and the text splicing they drive.
//!
//! An [`Anchor`] names the single point in a file where a block is inserted.
//! Splicing is pure: it takes the current content and returns the new
//! content, leaving every byte outside the insertion point untouched.

use std::fmt;
use std::ops::Range;

use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::domain::error::DomainError;

/// A literal string or a regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    /// Match `text` exactly.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Compile a regular expression.
    pub fn regex(source: &str) -> Result<Self, DomainError> {
        Regex::new(source)
            .map(Self::Regex)
            .map_err(|e| DomainError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Regex(r) => r.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// One range per match start, left to right, overlapping matches
    /// included. Zero-width regex matches count as insertion points.
    fn ranges(&self, haystack: &str, endings: LineEnding) -> Vec<Range<usize>> {
        let needle = match self {
            Self::Literal(needle) => Some(endings.apply(needle)),
            Self::Regex(_) => None,
        };

        let mut ranges = Vec::new();
        let mut at = 0;
        while at <= haystack.len() {
            let found = match (self, &needle) {
                (Self::Regex(re), _) => re.find_at(haystack, at).map(|m| m.range()),
                (Self::Literal(_), Some(needle)) => haystack[at..]
                    .find(needle.as_str())
                    .map(|i| at + i..at + i + needle.len()),
                (Self::Literal(_), None) => None,
            };
            let Some(range) = found else { break };
            at = next_char_boundary(haystack, range.start);
            ranges.push(range);
        }
        ranges
    }

    /// Replace every match of this pattern in `content`.
    ///
    /// Literal replacements are inserted verbatim; regex replacements may
    /// reference capture groups (`$1`, `${name}`).
    pub fn replace_all(&self, content: &str, replacement: &str) -> (String, usize) {
        match self {
            Self::Literal(needle) if needle.is_empty() => (content.to_string(), 0),
            Self::Literal(needle) => {
                let count = content.matches(needle.as_str()).count();
                (content.replace(needle.as_str(), replacement), count)
            }
            Self::Regex(re) => {
                let count = re.find_iter(content).count();
                if count == 0 {
                    return (content.to_string(), 0);
                }
                (re.replace_all(content, replacement).into_owned(), count)
            }
        }
    }

    /// Like [`Pattern::replace_all`] but never expands `$` references.
    pub fn replace_all_verbatim(&self, content: &str, replacement: &str) -> (String, usize) {
        match self {
            Self::Regex(re) => {
                let count = re.find_iter(content).count();
                (re.replace_all(content, NoExpand(replacement)).into_owned(), count)
            }
            literal => literal.replace_all(content, replacement),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "{s:?}"),
            Self::Regex(r) => write!(f, "/{}/", r.as_str()),
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where the block goes relative to the matched anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    After,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// Which match to use when the anchor occurs more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Occurrence {
    /// Exactly one match is required.
    #[default]
    Unique,
    /// Take the first match.
    First,
    /// Take the last match.
    Last,
}

/// Locates the insertion point inside a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pattern: Pattern,
    position: Position,
    occurrence: Occurrence,
}

impl Anchor {
    /// Build an anchor, rejecting empty patterns.
    pub fn try_new(pattern: Pattern, position: Position) -> Result<Self, DomainError> {
        if pattern.is_empty() {
            return Err(DomainError::EmptyAnchor);
        }
        Ok(Self {
            pattern,
            position,
            occurrence: Occurrence::Unique,
        })
    }

    /// Insert before a literal anchor.
    ///
    /// # Panics
    /// Panics if `literal` is empty.
    pub fn before(literal: impl Into<String>) -> Self {
        Self::literal(literal, Position::Before)
    }

    /// Insert after a literal anchor.
    ///
    /// # Panics
    /// Panics if `literal` is empty.
    pub fn after(literal: impl Into<String>) -> Self {
        Self::literal(literal, Position::After)
    }

    fn literal(literal: impl Into<String>, position: Position) -> Self {
        match Self::try_new(Pattern::literal(literal), position) {
            Ok(anchor) => anchor,
            Err(e) => panic!("{e}"),
        }
    }

    /// Pick a specific match instead of requiring a unique one.
    pub fn occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn occurrence_policy(&self) -> Occurrence {
        self.occurrence
    }

    /// Splice `text` into `content` at this anchor.
    ///
    /// Every start position counts towards uniqueness, so `end\nend` in
    /// `end\nend\nend` is ambiguous. A zero-width regex match (`\A`,
    /// `(?m)^`) is an insertion point; before and after coincide there.
    ///
    /// When `content` uses CRLF line endings, literal anchors and the
    /// inserted text are translated to CRLF first.
    pub fn splice(&self, content: &str, text: &str) -> Result<String, AnchorMiss> {
        let endings = LineEnding::detect(content);
        let ranges = self.pattern.ranges(content, endings);

        let range = match (self.occurrence, ranges.len()) {
            (_, 0) => return Err(AnchorMiss::NotFound),
            (Occurrence::Unique, 1) | (Occurrence::First, _) => ranges[0].clone(),
            (Occurrence::Last, n) => ranges[n - 1].clone(),
            (Occurrence::Unique, n) => return Err(AnchorMiss::Ambiguous { matches: n }),
        };

        let at = match self.position {
            Position::Before => range.start,
            Position::After => range.end,
        };
        let text = endings.apply(text);

        let mut out = String::with_capacity(content.len() + text.len());
        out.push_str(&content[..at]);
        out.push_str(&text);
        out.push_str(&content[at..]);
        Ok(out)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.position, self.pattern)
    }
}

/// Offset of the character after `offset`, or past the end.
fn next_char_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| offset + c.len_utf8())
}

/// Why a splice could not find its insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMiss {
    NotFound,
    Ambiguous { matches: usize },
}

/// Line-ending convention of a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    /// CRLF if the content contains any `\r\n`, LF otherwise.
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Rewrite the line endings of `text` to this convention.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "module Demo\n  class Application < Rails::Application\n    config.x = 0\n  end\nend\n";

    #[test]
    fn inject_before_splits_at_anchor() {
        let anchor = Anchor::before("  end\nend");
        let out = anchor.splice(APP, "    config.y = 1\n").unwrap();
        let (prefix, suffix) = APP.split_once("  end\nend").unwrap();
        assert_eq!(out, format!("{prefix}    config.y = 1\n  end\nend{suffix}"));
    }

    #[test]
    fn inject_after_splits_at_anchor() {
        let anchor = Anchor::after("config.x = 0\n");
        let out = anchor.splice(APP, "    config.z = 2\n").unwrap();
        assert!(out.contains("config.x = 0\n    config.z = 2\n  end\n"));
    }

    #[test]
    fn missing_anchor_is_not_found() {
        let anchor = Anchor::before("nothing like this");
        assert_eq!(anchor.splice(APP, "x"), Err(AnchorMiss::NotFound));
    }

    #[test]
    fn repeated_anchor_is_ambiguous_by_default() {
        let anchor = Anchor::after("end\n");
        assert_eq!(
            anchor.splice(APP, "x"),
            Err(AnchorMiss::Ambiguous { matches: 2 })
        );
    }

    #[test]
    fn first_and_last_disambiguate() {
        let content = "a;b;c";
        let first = Anchor::after(";").occurrence(Occurrence::First);
        let last = Anchor::after(";").occurrence(Occurrence::Last);
        assert_eq!(first.splice(content, "X").unwrap(), "a;Xb;c");
        assert_eq!(last.splice(content, "X").unwrap(), "a;b;Xc");
    }

    #[test]
    fn crlf_content_keeps_crlf() {
        let content = "require 'a'\r\nrequire 'b'\r\n";
        let anchor = Anchor::after("require 'a'\n");
        let out = anchor.splice(content, "require 'x'\n").unwrap();
        assert_eq!(out, "require 'a'\r\nrequire 'x'\r\nrequire 'b'\r\n");
    }

    #[test]
    fn regex_anchor() {
        let pattern = Pattern::regex(r"(?m)^end$").unwrap();
        let anchor = Anchor::try_new(pattern, Position::Before).unwrap();
        let out = anchor.splice(APP, "  # tail\n").unwrap();
        assert!(out.ends_with("  end\n  # tail\nend\n"));
    }

    #[test]
    fn overlapping_literal_matches_are_ambiguous() {
        let anchor = Anchor::before("end\nend");
        assert_eq!(
            anchor.splice("end\nend\nend\n", "X\n"),
            Err(AnchorMiss::Ambiguous { matches: 2 })
        );
    }

    #[test]
    fn overlapping_regex_matches_are_ambiguous() {
        let anchor = Anchor::try_new(Pattern::regex(r"end\nend").unwrap(), Position::Before).unwrap();
        assert_eq!(
            anchor.splice("end\nend\nend\n", "X\n"),
            Err(AnchorMiss::Ambiguous { matches: 2 })
        );
    }

    #[test]
    fn last_overlapping_match_is_selectable() {
        let anchor = Anchor::after("end\nend").occurrence(Occurrence::Last);
        assert_eq!(anchor.splice("end\nend\nend\n", "X").unwrap(), "end\nend\nendX\n");
    }

    #[test]
    fn zero_width_regex_is_an_insertion_point() {
        let start = Anchor::try_new(Pattern::regex("(?m)^").unwrap(), Position::Before).unwrap();
        assert_eq!(start.splice("one line", "X").unwrap(), "Xone line");

        let text_start = Anchor::try_new(Pattern::regex(r"\A").unwrap(), Position::After).unwrap();
        assert_eq!(text_start.splice("a\nb\n", "# top\n").unwrap(), "# top\na\nb\n");
    }

    #[test]
    fn zero_width_regex_on_several_lines_is_ambiguous() {
        let anchor = Anchor::try_new(Pattern::regex("(?m)^").unwrap(), Position::Before).unwrap();
        assert_eq!(
            anchor.splice("a\nb", "X"),
            Err(AnchorMiss::Ambiguous { matches: 2 })
        );
    }

    #[test]
    fn multibyte_content_is_scanned_safely() {
        let anchor = Anchor::after("é").occurrence(Occurrence::Last);
        assert_eq!(anchor.splice("éé", "!").unwrap(), "éé!");
    }

    #[test]
    fn empty_anchor_is_rejected() {
        assert_eq!(
            Anchor::try_new(Pattern::literal(""), Position::After),
            Err(DomainError::EmptyAnchor)
        );
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(matches!(
            Pattern::regex("("),
            Err(DomainError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn replace_without_matches_is_identity() {
        let pattern = Pattern::regex(r"\n{3,}").unwrap();
        let (out, count) = pattern.replace_all("a\n\nb\n", "\n\n");
        assert_eq!(out, "a\n\nb\n");
        assert_eq!(count, 0);
    }

    #[test]
    fn collapse_blank_lines() {
        let pattern = Pattern::regex(r"\n{2,}").unwrap();
        let (out, count) = pattern.replace_all("gem 'a'\n\n\n\ngem 'b'\n\n", "\n\n");
        assert_eq!(out, "gem 'a'\n\ngem 'b'\n\n");
        assert_eq!(count, 2);
    }

    #[test]
    fn literal_replacement_is_verbatim() {
        let pattern = Pattern::literal("= false");
        let (out, count) = pattern.replace_all("x = false\ny = false\n", "= $1");
        assert_eq!(out, "x = $1\ny = $1\n");
        assert_eq!(count, 2);
    }

    #[test]
    fn verbatim_regex_replacement_keeps_dollar() {
        let pattern = Pattern::regex("a").unwrap();
        let (out, _) = pattern.replace_all_verbatim("a", "$1");
        assert_eq!(out, "$1");
    }
}
