//! A document plus its marker overlay and the active chunk highlighter.
//!
//! The session is the only place edits enter. Each edit is split by [`Document`] into primitive
//! deltas, and every delta reaches the attached [`ChunkHighlighter`] before the next one is
//! applied. A highlighter only observes the document while it is attached.
//!
//! # Example
//!
//! ```rust
//! use chunk_core::{ChunkSession, FencePatterns, MarkerStyle, RowState};
//! use chunk_core_lang::FenceConfig;
//!
//! let mut session = ChunkSession::new("text\n<<setup>>=\nx <- 1\n@\nmore text");
//! let fences = FencePatterns::compile(&FenceConfig::sweave()).unwrap();
//! session.attach(fences, MarkerStyle::default());
//!
//! assert_eq!(session.states().unwrap()[2], RowState::ForeignBody);
//! assert_eq!(session.markers().len(), 3);
//!
//! // Deleting the closer leaves the chunk open to the end of the document.
//! session.remove_lines(3, 3);
//! assert_eq!(session.states().unwrap()[3], RowState::ForeignBody);
//! assert_eq!(session.markers().len(), 3);
//! ```

use crate::document::{ChangeListener, Document, LineDelta, Position};
use crate::fence::FencePatterns;
use crate::highlighter::ChunkHighlighter;
use crate::markers::MarkerRegistry;
use crate::row_state::RowState;
use crate::sync::MarkerStyle;

/// Owns a [`Document`], its [`MarkerRegistry`], and an optional [`ChunkHighlighter`].
#[derive(Debug, Clone, Default)]
pub struct ChunkSession {
    document: Document,
    markers: MarkerRegistry,
    highlighter: Option<ChunkHighlighter>,
}

impl ChunkSession {
    /// Create a session with no highlighter attached.
    pub fn new(text: &str) -> Self {
        Self {
            document: Document::new(text),
            markers: MarkerRegistry::new(),
            highlighter: None,
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The marker overlay.
    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Mutable access to the marker overlay (for markers owned by other features).
    pub fn markers_mut(&mut self) -> &mut MarkerRegistry {
        &mut self.markers
    }

    /// The attached highlighter.
    pub fn highlighter(&self) -> Option<&ChunkHighlighter> {
        self.highlighter.as_ref()
    }

    /// Row states of the attached highlighter.
    pub fn states(&self) -> Option<&[RowState]> {
        self.highlighter.as_ref().map(ChunkHighlighter::states)
    }

    /// Attach a highlighter, releasing the markers of any previously attached one.
    pub fn attach(&mut self, fences: FencePatterns, style: MarkerStyle) {
        self.detach();
        self.highlighter = Some(ChunkHighlighter::new(
            fences,
            style,
            &self.document,
            &mut self.markers,
        ));
    }

    /// Replace the highlighter without clearing its markers; the new one adopts them.
    ///
    /// Adoption only recognizes markers of the new style, so a highlighter with a different
    /// style is detached first.
    pub fn reload(&mut self, fences: FencePatterns, style: MarkerStyle) {
        if let Some(previous) = self.highlighter.take()
            && previous.synchronizer().style() != &style
        {
            previous.detach(&mut self.markers);
        }
        self.highlighter = Some(ChunkHighlighter::new(
            fences,
            style,
            &self.document,
            &mut self.markers,
        ));
    }

    /// Detach the highlighter and release every marker it owns.
    pub fn detach(&mut self) {
        if let Some(highlighter) = self.highlighter.take() {
            highlighter.detach(&mut self.markers);
        }
    }

    /// Insert `text` at `position`.
    pub fn insert(&mut self, position: Position, text: &str) -> Position {
        self.edit(|document, listener| document.insert(position, text, listener))
    }

    /// Remove the text between `start` and `end`.
    pub fn remove(&mut self, start: Position, end: Position) -> Position {
        self.edit(|document, listener| document.remove(start, end, listener))
    }

    /// Insert whole lines before `row`.
    pub fn insert_lines<S: AsRef<str>>(&mut self, row: usize, lines: &[S]) -> Position {
        self.edit(|document, listener| document.insert_lines(row, lines, listener))
    }

    /// Remove rows `first..=last`.
    pub fn remove_lines(&mut self, first: usize, last: usize) -> Position {
        self.edit(|document, listener| document.remove_lines(first, last, listener))
    }

    /// Replace the whole document text.
    pub fn set_text(&mut self, text: &str) {
        self.edit(|document, listener| document.set_text(text, listener))
    }

    fn edit<R>(&mut self, f: impl FnOnce(&mut Document, &mut dyn ChangeListener) -> R) -> R {
        let Self {
            document,
            markers,
            highlighter,
        } = self;
        let mut listener = |doc: &Document, delta: &LineDelta| {
            if let Some(highlighter) = highlighter.as_mut() {
                highlighter.apply_delta(doc, markers, delta);
            }
        };
        f(document, &mut listener)
    }
}
