//! Editor session
//!
//! An in-process stand-in for an editor: open documents with edit counters,
//! one active document and its cursor. Every editor event is a method call
//! that may redecorate the active document through the sink.
//!
//! Decoration gates, in order:
//! 1. there is an active document
//! 2. the gate accepts it for decoration (markdown is skipped by default)
//! 3. the index has processed it

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, DocumentGate};
use crate::core::text::Position;
use crate::decorations::{build, SelectionOutcome, SuppressionState};
use crate::error::{Error, Result};
use crate::index::document::{DocumentId, DocumentIndex, DocumentVersion};
use crate::index::store::AnchorIndex;
use crate::links::{find_anchor, AnchorTarget};

use super::sink::RenderSink;

#[derive(Debug, Clone)]
struct OpenDocument {
    text: String,
    counter: i64,
}

impl OpenDocument {
    fn version(&self) -> DocumentVersion {
        DocumentVersion::Counter(self.counter)
    }
}

/// Where a jump sent the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTarget {
    pub document: DocumentId,
    pub position: Position,
}

pub struct EditorSession<S: RenderSink> {
    config: Config,
    index: AnchorIndex,
    suppression: SuppressionState,
    documents: BTreeMap<DocumentId, OpenDocument>,
    active: Option<DocumentId>,
    selection: Option<Position>,
    sink: S,
}

impl<S: RenderSink> EditorSession<S> {
    pub fn new(config: Config, sink: S) -> Result<Self> {
        let index = AnchorIndex::with_scanner(config.scanner()?);
        Ok(Self {
            config,
            index,
            suppression: SuppressionState::new(),
            documents: BTreeMap::new(),
            active: None,
            selection: None,
            sink,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &AnchorIndex {
        &self.index
    }

    pub fn suppression(&self) -> &SuppressionState {
        &self.suppression
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn active(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    fn supported(&self, id: &DocumentId) -> bool {
        self.config.is_supported_document(Path::new(id.as_str()))
    }

    fn process(&mut self, id: &DocumentId) -> Option<Arc<DocumentIndex>> {
        if !self.supported(id) {
            return None;
        }
        let document = self.documents.get(id)?;
        Some(
            self.index
                .ensure_processed(id, &document.version(), &document.text),
        )
    }

    /// Open a document; supported documents are indexed immediately.
    ///
    /// Reopening an open document counts as a new version.
    pub fn open(&mut self, id: impl Into<DocumentId>, text: impl Into<String>) {
        let id = id.into();
        let counter = self.documents.get(&id).map_or(1, |open| open.counter + 1);
        self.documents.insert(
            id.clone(),
            OpenDocument {
                text: text.into(),
                counter,
            },
        );
        self.process(&id);
    }

    /// Replace a document's text: new version, fresh index, redecorate if active.
    ///
    /// Returns whether the sink was updated.
    pub fn change(&mut self, id: &DocumentId, text: impl Into<String>) -> Result<bool> {
        let document = self.documents.get_mut(id).ok_or_else(|| unknown(id))?;
        document.text = text.into();
        document.counter += 1;

        self.index.invalidate(id);
        self.process(id);

        if self.active.as_ref() == Some(id) {
            Ok(self.decorate())
        } else {
            Ok(false)
        }
    }

    pub fn close(&mut self, id: &DocumentId) {
        if self.documents.remove(id).is_none() {
            return;
        }
        self.index.close(id);
        self.sink.clear(id);
        if self.active.as_ref() == Some(id) {
            self.active = None;
            self.selection = None;
        }
    }

    /// Make `id` the active document with the cursor at `selection`
    pub fn activate(&mut self, id: &DocumentId, selection: Option<Position>) -> Result<bool> {
        if !self.documents.contains_key(id) {
            return Err(unknown(id));
        }
        self.active = Some(id.clone());
        self.selection = selection;
        Ok(self.decorate())
    }

    /// Move the cursor in the active document.
    ///
    /// The first move that lands where the last jump expected it is not
    /// redecorated.
    pub fn select(&mut self, position: Position) -> bool {
        let Some(active) = self.active.clone() else {
            return false;
        };
        self.selection = Some(position);

        match self.suppression.observe_selection(&active, position) {
            SelectionOutcome::Landed => {
                log::debug!(
                    "cursor landed on jump target {} in {}, skipping",
                    position,
                    active
                );
                false
            }
            SelectionOutcome::Diverged => {
                log::debug!("cursor left jump target, suppression cleared");
                self.decorate()
            }
            SelectionOutcome::Settled | SelectionOutcome::Idle => self.decorate(),
        }
    }

    /// Follow the link named `name` from the active document.
    ///
    /// Ambiguous links go to their first candidate. Returns `None` when the
    /// link does not resolve.
    pub fn jump_to_anchor(&mut self, name: &str) -> Result<Option<JumpTarget>> {
        let Some(active) = self.active.clone() else {
            return Ok(None);
        };
        let Some(document) = self.process(&active) else {
            return Ok(None);
        };

        let project = self.config.scope.project(&self.index);
        let target = find_anchor(name, &document, project)
            .preferred()
            .map(|AnchorTarget { document, anchor }| (document.clone(), anchor.source.start));

        let Some((target_id, offset)) = target else {
            log::debug!("no anchor named {} reachable from {}", name, active);
            return Ok(None);
        };

        let position = match self.index.get(&target_id) {
            Some(target_doc) => target_doc.source().position_of(offset),
            None => return Err(unknown(&target_id)),
        };

        self.suppression.set_expected(target_id.clone(), position);

        if target_id != active {
            self.activate(&target_id, Some(position))?;
        }
        self.select(position);

        Ok(Some(JumpTarget {
            document: target_id,
            position,
        }))
    }

    /// Redecorate the active document now
    pub fn refresh(&mut self) -> bool {
        self.decorate()
    }

    fn decorate(&mut self) -> bool {
        let Some(id) = self.active.clone() else {
            return false;
        };
        if !self.config.decorates(Path::new(id.as_str())) {
            log::trace!("{} is not decorated", id);
            return false;
        }
        if !self.index.is_file_processed(&id) {
            log::trace!("{} has not been processed", id);
            return false;
        }
        let Some(document) = self.index.get(&id).cloned() else {
            return false;
        };

        let ranges = build(&document, self.selection);
        self.sink.apply(&document, &ranges);
        true
    }
}

fn unknown(id: &DocumentId) -> Error {
    Error::UnknownDocument {
        id: id.to_string(),
    }
}
