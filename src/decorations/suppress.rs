//! Jump suppression
//!
//! A programmatic jump records where the cursor is expected to land. The
//! selection change caused by the jump then matches the record and the host
//! skips the one recompute it would otherwise do. Later selections on the same
//! spot recompute as usual; any other selection clears the record.

use serde::Serialize;

use crate::core::text::Position;
use crate::index::document::DocumentId;

/// Where a jump expects the cursor to land
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuppressionRecord {
    pub document: DocumentId,
    pub line: u32,
    pub character: u32,
}

impl SuppressionRecord {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }

    pub fn matches(&self, document: &DocumentId, position: Position) -> bool {
        &self.document == document && self.position() == position
    }
}

/// What a selection change means for a pending jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// No jump pending
    Idle,
    /// The cursor is where the jump said it would be; the record stays
    Landed,
    /// Still on the jump target after the skipped recompute
    Settled,
    /// The cursor went elsewhere; the record was cleared
    Diverged,
}

/// Single-slot record of the last programmatic jump
#[derive(Debug, Clone, Default)]
pub struct SuppressionState {
    expected: Option<SuppressionRecord>,
    landed: bool,
}

impl SuppressionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a jump target, replacing any earlier one
    pub fn set_expected(&mut self, document: DocumentId, position: Position) {
        log::trace!("expecting cursor at {} in {}", position, document);
        self.expected = Some(SuppressionRecord {
            document,
            line: position.line,
            character: position.character,
        });
        self.landed = false;
    }

    pub fn expected(&self) -> Option<&SuppressionRecord> {
        self.expected.as_ref()
    }

    pub fn clear(&mut self) {
        self.landed = false;
        if let Some(record) = self.expected.take() {
            log::trace!(
                "cleared expected cursor {} in {}",
                record.position(),
                record.document
            );
        }
    }

    /// Apply the selection-change rule for a cursor now at `position` in `document`
    pub fn observe_selection(
        &mut self,
        document: &DocumentId,
        position: Position,
    ) -> SelectionOutcome {
        match &self.expected {
            None => SelectionOutcome::Idle,
            Some(record) if record.matches(document, position) => {
                if self.landed {
                    SelectionOutcome::Settled
                } else {
                    self.landed = true;
                    SelectionOutcome::Landed
                }
            }
            Some(_) => {
                self.clear();
                SelectionOutcome::Diverged
            }
        }
    }
}
