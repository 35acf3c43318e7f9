//! Text geometry
//!
//! Markers are located by byte spans into the document text. Hosts talk in
//! zero-based `(line, character)` positions, where `character` counts Unicode
//! scalar values from the start of the line. `SourceText` converts between the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Half-open byte range `[start, end)` into a document's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} past end {}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `offset` lies inside the span or touches either edge.
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Borrow the spanned text, or "" if the span does not fit `text`.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// Zero-based line/character position
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Parses the `LINE:CHAR` form used on the command line
impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPosition {
            input: s.to_string(),
        };

        let (line, character) = s.trim().split_once(':').ok_or_else(invalid)?;
        let line = line.trim().parse().map_err(|_| invalid())?;
        let character = character.trim().parse().map_err(|_| invalid())?;

        Ok(Position { line, character })
    }
}

/// A span expressed as start/end positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

/// Document text plus the byte offset of every line start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );

        Self { text, line_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a line's content, without the line terminator.
    fn line_bounds(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((start, end))
    }

    /// Convert a position to a byte offset.
    ///
    /// Returns `None` when the line does not exist or the character lies past
    /// the end of the line, so a stale cursor never maps onto unrelated text.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        let (start, end) = self.line_bounds(position.line as usize)?;
        let wanted = position.character as usize;

        let line = &self.text[start..end];
        let mut seen = 0;
        for (i, _) in line.char_indices() {
            if seen == wanted {
                return Some(start + i);
            }
            seen += 1;
        }

        (seen == wanted).then_some(end)
    }

    /// Convert a byte offset to a position, clamping to the end of the text.
    pub fn position_of(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|s| *s <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = self.text[line_start..offset].chars().count();

        Position::new(line as u32, character as u32)
    }

    pub fn range_of(&self, span: Span) -> TextRange {
        TextRange {
            start: self.position_of(span.start),
            end: self.position_of(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains_inclusive_edges() {
        let span = Span::new(3, 8);
        assert!(span.contains_inclusive(3));
        assert!(span.contains_inclusive(8));
        assert!(!span.contains_inclusive(2));
        assert!(!span.contains_inclusive(9));
    }

    #[test]
    fn test_span_overlaps() {
        assert!(Span::new(0, 5).overlaps(&Span::new(4, 6)));
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 6)));
    }

    #[test]
    fn test_position_parse() {
        let pos: Position = "10:4".parse().unwrap();
        assert_eq!(pos, Position::new(10, 4));
        assert!("10".parse::<Position>().is_err());
        assert!("a:b".parse::<Position>().is_err());
    }

    #[test]
    fn test_offset_round_trip() {
        let source = SourceText::new("ab\ncdé\nf");
        assert_eq!(source.line_count(), 3);
        assert_eq!(source.offset_of(Position::new(1, 0)), Some(3));
        assert_eq!(source.offset_of(Position::new(1, 3)), Some(7));
        assert_eq!(source.position_of(7), Position::new(1, 3));
        assert_eq!(source.offset_of(Position::new(2, 1)), Some(source.len()));
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let source = SourceText::new("ab\ncd");
        assert_eq!(source.offset_of(Position::new(0, 3)), None);
        assert_eq!(source.offset_of(Position::new(5, 0)), None);
    }

    #[test]
    fn test_offset_ignores_carriage_return() {
        let source = SourceText::new("ab\r\ncd");
        assert_eq!(source.offset_of(Position::new(0, 2)), Some(2));
        assert_eq!(source.offset_of(Position::new(0, 3)), None);
        assert_eq!(source.offset_of(Position::new(1, 0)), Some(4));
    }

    #[test]
    fn test_range_of() {
        let source = SourceText::new("x\n[[anchor:a]]");
        let range = source.range_of(Span::new(2, 14));
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 12));
    }
}
