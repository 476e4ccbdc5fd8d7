#![warn(missing_docs)]
//! Chunk Core - Headless Background Highlighting for Literate Documents
//!
//! # Overview
//!
//! `chunk-core` classifies every row of a live document as plain text or as part of an embedded
//! block (a "chunk") delimited by begin/end line patterns, such as R code inside Sweave, R
//! Markdown, or R HTML documents. It keeps one background marker per chunk row in sync with that
//! classification as the document is edited.
//!
//! Chunk contents are opaque: only block boundaries are detected, at row granularity.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ChunkSession (document + overlay + mode)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  ChunkHighlighter (delta -> splice/sync)    │  ← Change Adapter
//! ├──────────────────────┬──────────────────────┤
//! │  RowClassifier       │  MarkerSynchronizer  │  ← Core Algorithms
//! ├──────────────────────┼──────────────────────┤
//! │  Document (Rope)     │  MarkerHost          │  ← Collaborators
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use chunk_core::{ChunkSession, FencePatterns, MarkerStyle, Position, RowState};
//! use chunk_core_lang::FenceConfig;
//!
//! let mut session = ChunkSession::new("intro\n```{r}\n1 + 1\n```\noutro");
//! let fences = FencePatterns::compile(&FenceConfig::r_markdown()).unwrap();
//! session.attach(fences, MarkerStyle::default());
//!
//! assert_eq!(
//!     session.states().unwrap(),
//!     &[
//!         RowState::Text,
//!         RowState::BlockBegin,
//!         RowState::ForeignBody,
//!         RowState::BlockEnd,
//!         RowState::Text,
//!     ]
//! );
//!
//! // Typing inside the chunk only touches the edited row.
//! session.insert(Position::new(2, 5), " + 2");
//! assert_eq!(session.markers().rows_with_class("foreign_line"), vec![1, 2, 3]);
//! ```
//!
//! # Module Description
//!
//! - [`fence`] - Compiled begin/end patterns
//! - [`row_state`] - Row classification and incremental propagation
//! - [`sync`] - Row -> marker reconciliation
//! - [`highlighter`] - Change adapter tying classification and markers to document deltas
//! - [`document`] - Rope-backed document and primitive line deltas
//! - [`markers`] - Marker overlay data model and in-memory host
//! - [`session`] - Document + overlay + highlighter wiring
//!
//! # Guarantees
//!
//! - After every delta, row states equal a from-scratch classification of the document.
//! - After every delta, a marker exists for a row iff the row is not [`RowState::Text`].
//! - In-line edits reclassify only the rows whose state actually changes.

pub mod document;
pub mod fence;
pub mod highlighter;
pub mod markers;
pub mod row_state;
pub mod session;
pub mod sync;
mod text;

pub use document::{ChangeListener, DeltaAction, Document, LineDelta, LineSource, Position};
pub use fence::{FenceError, FencePatterns, FenceRole};
pub use highlighter::ChunkHighlighter;
pub use markers::{Marker, MarkerHost, MarkerId, MarkerKind, MarkerRegistry, MarkerStats};
pub use row_state::{RowClassifier, RowState, classify_document, classify_line};
pub use session::ChunkSession;
pub use sync::{MarkerStyle, MarkerSynchronizer};
pub use text::is_newline;
