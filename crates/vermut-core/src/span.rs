//! Source positions, spans and target locations.
//!
//! Every statement and expression of a program tree carries a [`SourceSpan`]
//! over a monotonic token axis. A span is a closed range `[start, end]` plus
//! an `anchor`: a single position inside the range that tells apart nodes
//! whose ranges coincide (the operator token of a binary expression, the
//! token of a literal).
//!
//! Mutation requests address nodes by [`TargetLocation`], never by node
//! identity:
//!
//! ```
//! use vermut_core::span::{Position, SourceSpan, TargetLocation};
//!
//! let span = SourceSpan::new(10, 14, 12);
//! let by_anchor: TargetLocation = "12".parse().unwrap();
//! let by_span: TargetLocation = "10-14".parse().unwrap();
//!
//! assert!(by_anchor.matches(&span));
//! assert!(by_span.matches(&span));
//! assert!(span.contains(Position(13)));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Position
// ============================================================================

/// A point on the token axis.
///
/// Positions are totally ordered; the front end guarantees that a parent's
/// range encloses the ranges of its children.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(pub u32);

impl Position {
    /// Create a new position.
    pub fn new(pos: u32) -> Self {
        Position(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Position {
    fn from(pos: u32) -> Self {
        Position(pos)
    }
}

// ============================================================================
// SourceSpan
// ============================================================================

/// Source range of a node plus its disambiguating anchor.
///
/// Equality compares `start` and `end` only: two nodes covering the same
/// tokens have equal spans even when their anchors differ.
#[derive(Debug, Clone, Copy, Default, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First token of the node (inclusive).
    pub start: Position,
    /// Last token of the node (inclusive).
    pub end: Position,
    /// Landmark token inside `[start, end]`.
    pub anchor: Position,
}

impl SourceSpan {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if the anchor lies outside `[start, end]`.
    pub fn new(start: u32, end: u32, anchor: u32) -> Self {
        assert!(
            start <= anchor && anchor <= end,
            "Span anchor ({}) must lie within [{}, {}]",
            anchor,
            start,
            end
        );
        SourceSpan {
            start: Position(start),
            end: Position(end),
            anchor: Position(anchor),
        }
    }

    /// Span of a single token; anchor, start and end coincide.
    pub fn token(pos: u32) -> Self {
        SourceSpan::new(pos, pos, pos)
    }

    /// Span from `start` to `end` anchored at `start`.
    pub fn range(start: u32, end: u32) -> Self {
        SourceSpan::new(start, end, start)
    }

    /// Check whether `pos` lies within `[start, end]`.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Check whether this span encloses `other` entirely.
    pub fn encloses(&self, other: &SourceSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of tokens covered.
    pub fn len(&self) -> u32 {
        self.end.0.saturating_sub(self.start.0) + 1
    }

    /// Spans always cover at least one token.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The location that addresses this span by range.
    pub fn as_span_location(&self) -> TargetLocation {
        TargetLocation::Span {
            start: self.start,
            end: self.end,
        }
    }

    /// The location that addresses this span by anchor.
    pub fn as_anchor_location(&self) -> TargetLocation {
        TargetLocation::Anchor(self.anchor)
    }
}

impl PartialEq for SourceSpan {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl std::hash::Hash for SourceSpan {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl PartialOrd for SourceSpan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceSpan {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]@{}", self.start, self.end, self.anchor)
    }
}

// ============================================================================
// TargetLocation
// ============================================================================

/// How a mutation request addresses its target node.
///
/// Node kinds with a distinguishing token (binary and unary operators,
/// literals, name references, member selects) are addressed by `Anchor`;
/// statements, calls, case blocks and other compound nodes without a single
/// landmark token are addressed by `Span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetLocation {
    /// A single landmark position.
    Anchor(Position),
    /// An exact `start-end` range.
    Span { start: Position, end: Position },
}

impl TargetLocation {
    /// Create an anchor location.
    pub fn anchor(pos: u32) -> Self {
        TargetLocation::Anchor(Position(pos))
    }

    /// Create a span location.
    pub fn span(start: u32, end: u32) -> Self {
        TargetLocation::Span {
            start: Position(start),
            end: Position(end),
        }
    }

    /// True if this location identifies exactly the node carrying `span`.
    pub fn matches(&self, span: &SourceSpan) -> bool {
        match *self {
            TargetLocation::Anchor(pos) => span.anchor == pos,
            TargetLocation::Span { start, end } => span.start == start && span.end == end,
        }
    }

    /// Pruning predicate: true if a node identified by this location could
    /// lie inside `span`.
    pub fn may_be_inside(&self, span: &SourceSpan) -> bool {
        match *self {
            TargetLocation::Anchor(pos) => span.contains(pos),
            TargetLocation::Span { start, end } => span.start <= start && end <= span.end,
        }
    }

    /// First position covered by this location.
    pub fn first(&self) -> Position {
        match *self {
            TargetLocation::Anchor(pos) => pos,
            TargetLocation::Span { start, .. } => start,
        }
    }
}

impl fmt::Display for TargetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLocation::Anchor(pos) => write!(f, "{}", pos),
            TargetLocation::Span { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

/// Error parsing a textual target location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationParseError {
    /// The input was empty.
    #[error("empty target location")]
    Empty,

    /// A position component is not an unsigned integer.
    #[error("invalid position '{text}' in target location")]
    InvalidPosition { text: String },

    /// A span whose start lies after its end.
    #[error("span start {start} lies after end {end}")]
    InvertedSpan { start: u32, end: u32 },
}

impl FromStr for TargetLocation {
    type Err = LocationParseError;

    /// Parse `"12"` as an anchor and `"12-40"` as a span.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LocationParseError::Empty);
        }

        let parse_pos = |text: &str| {
            text.trim()
                .parse::<u32>()
                .map_err(|_| LocationParseError::InvalidPosition {
                    text: text.to_string(),
                })
        };

        match s.split_once('-') {
            None => Ok(TargetLocation::anchor(parse_pos(s)?)),
            Some((start, end)) => {
                let start = parse_pos(start)?;
                let end = parse_pos(end)?;
                if start > end {
                    return Err(LocationParseError::InvertedSpan { start, end });
                }
                Ok(TargetLocation::span(start, end))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_equality_ignores_anchor() {
        let a = SourceSpan::new(3, 9, 4);
        let b = SourceSpan::new(3, 9, 7);
        assert_eq!(a, b);
        assert_ne!(a, SourceSpan::new(3, 8, 4));
    }

    #[test]
    fn test_span_contains_is_closed() {
        let span = SourceSpan::range(5, 8);
        assert!(span.contains(Position(5)));
        assert!(span.contains(Position(8)));
        assert!(!span.contains(Position(4)));
        assert!(!span.contains(Position(9)));
    }

    #[test]
    fn test_token_span_has_length_one() {
        let span = SourceSpan::token(42);
        assert_eq!(span.len(), 1);
        assert_eq!(span.anchor, Position(42));
    }

    #[test]
    #[should_panic(expected = "must lie within")]
    fn test_anchor_outside_span_panics() {
        let _ = SourceSpan::new(5, 8, 9);
    }

    #[test]
    fn test_parse_anchor_location() {
        let loc: TargetLocation = "17".parse().unwrap();
        assert_eq!(loc, TargetLocation::anchor(17));
        assert_eq!(loc.to_string(), "17");
    }

    #[test]
    fn test_parse_span_location() {
        let loc: TargetLocation = " 3-20 ".parse().unwrap();
        assert_eq!(loc, TargetLocation::span(3, 20));
        assert_eq!(loc.to_string(), "3-20");
    }

    #[test]
    fn test_parse_rejects_malformed_locations() {
        assert_eq!("".parse::<TargetLocation>(), Err(LocationParseError::Empty));
        assert!(matches!(
            "x-3".parse::<TargetLocation>(),
            Err(LocationParseError::InvalidPosition { .. })
        ));
        assert_eq!(
            "9-3".parse::<TargetLocation>(),
            Err(LocationParseError::InvertedSpan { start: 9, end: 3 })
        );
    }

    #[test]
    fn test_matches_uses_anchor_or_range() {
        let span = SourceSpan::new(10, 20, 15);
        assert!(TargetLocation::anchor(15).matches(&span));
        assert!(!TargetLocation::anchor(10).matches(&span));
        assert!(TargetLocation::span(10, 20).matches(&span));
        assert!(!TargetLocation::span(10, 19).matches(&span));
    }

    #[test]
    fn test_may_be_inside_prunes_disjoint_spans() {
        let outer = SourceSpan::range(10, 20);
        assert!(TargetLocation::anchor(12).may_be_inside(&outer));
        assert!(TargetLocation::span(11, 20).may_be_inside(&outer));
        assert!(!TargetLocation::anchor(21).may_be_inside(&outer));
        assert!(!TargetLocation::span(9, 12).may_be_inside(&outer));
    }
}
