//! Background highlighter for embedded blocks.
//!
//! [`ChunkHighlighter`] translates each primitive [`LineDelta`] into row-array splices, a minimal
//! reclassification, and a marker sync over the affected rows:
//!
//! | delta                       | rows                    | reclassify         | sync            |
//! |-----------------------------|-------------------------|--------------------|-----------------|
//! | insert `N` lines at `i`     | insert `N` at `i`       | `i..i+N`           | `i..` (tail)    |
//! | insert line break at `i`    | insert 1 at `i+1`       | `i`, `i+1`         | `i..` (tail)    |
//! | insert text at `i`          | -                       | `i`                | propagated span |
//! | remove `N` lines at `i`     | remove `N` at `i`       | `i`                | `i..` (tail)    |
//! | remove line break at `i`    | remove 1 at `i+1`       | `i`                | `i..` (tail)    |
//! | remove text at `i`          | -                       | `i`                | propagated span |

use crate::document::{DeltaAction, LineDelta, LineSource};
use crate::fence::FencePatterns;
use crate::markers::{MarkerHost, MarkerId};
use crate::row_state::{RowClassifier, RowState};
use crate::sync::{MarkerStyle, MarkerSynchronizer};
use crate::text::contains_line_break;

/// Classifies rows into text and embedded blocks and keeps one background marker per block row.
#[derive(Debug, Clone)]
pub struct ChunkHighlighter {
    classifier: RowClassifier,
    markers: MarkerSynchronizer,
}

impl ChunkHighlighter {
    /// Classify `lines`, adopt markers left in `host` by a previous highlighter with the same
    /// style, and reconcile every row.
    pub fn new<L, H>(fences: FencePatterns, style: MarkerStyle, lines: &L, host: &mut H) -> Self
    where
        L: LineSource + ?Sized,
        H: MarkerHost + ?Sized,
    {
        let classifier = RowClassifier::with_lines(fences, lines);
        let mut markers = MarkerSynchronizer::new(style);
        markers.adopt(host, lines.line_count());
        markers.sync(host, classifier.states(), 0, None);
        Self {
            classifier,
            markers,
        }
    }

    /// Row states, indexed by row.
    pub fn states(&self) -> &[RowState] {
        self.classifier.states()
    }

    /// State of `row`, if it exists.
    pub fn state(&self, row: usize) -> Option<RowState> {
        self.classifier.state(row)
    }

    /// The marker currently drawn for `row`.
    pub fn marker(&self, row: usize) -> Option<MarkerId> {
        self.markers.marker(row)
    }

    /// The row classifier.
    pub fn classifier(&self) -> &RowClassifier {
        &self.classifier
    }

    /// The marker synchronizer.
    pub fn synchronizer(&self) -> &MarkerSynchronizer {
        &self.markers
    }

    /// Handle one primitive delta that has already been applied to `lines`.
    ///
    /// Panics if the delta does not describe the current document (rows out of range, or a
    /// text delta that spans rows without being a single line break).
    pub fn apply_delta<L, H>(&mut self, lines: &L, host: &mut H, delta: &LineDelta)
    where
        L: LineSource + ?Sized,
        H: MarkerHost + ?Sized,
    {
        tracing::trace!(
            action = ?delta.action,
            start_row = delta.start.row,
            end_row = delta.end.row,
            "chunk highlighter delta"
        );
        let row = delta.start.row;
        assert!(
            delta.end.row >= row,
            "delta end row {} precedes start row {row}",
            delta.end.row
        );

        match delta.action {
            DeltaAction::InsertLines => {
                let count = delta.row_span();
                self.classifier.insert_rows(row, count);
                if count > 0 {
                    // New rows only depend on each other; propagation starts from the last one.
                    self.classifier.classify_rows(lines, row..row + count);
                    self.classifier.update_row(lines, row + count - 1);
                }
                self.sync_tail(host, row);
            }
            DeltaAction::RemoveLines => {
                self.classifier.remove_rows(row, delta.row_span());
                self.classifier.update_row(lines, row);
                self.sync_tail(host, row);
            }
            DeltaAction::InsertText if delta.is_line_break() => {
                assert_eq!(delta.row_span(), 1, "line break delta must span one row");
                self.classifier.insert_rows(delta.end.row, 1);
                self.classifier.update_row(lines, row);
                self.classifier.update_row(lines, row + 1);
                self.sync_tail(host, row);
            }
            DeltaAction::RemoveText if delta.is_line_break() => {
                assert_eq!(delta.row_span(), 1, "line break delta must span one row");
                self.classifier.remove_rows(delta.end.row, 1);
                self.classifier.update_row(lines, row);
                self.sync_tail(host, row);
            }
            DeltaAction::InsertText | DeltaAction::RemoveText => {
                assert!(
                    delta.row_span() == 0 && !contains_line_break(&delta.text),
                    "in-line text delta must stay on row {row}"
                );
                let touched_end = self.classifier.update_row(lines, row);
                let rows_changed = (touched_end - row).max(1);
                self.markers
                    .sync(host, self.classifier.states(), row, Some(rows_changed));
            }
        }

        assert_eq!(
            self.classifier.len(),
            lines.line_count(),
            "row states out of step with the document"
        );
    }

    /// Remove every marker this highlighter owns.
    pub fn detach<H: MarkerHost + ?Sized>(mut self, host: &mut H) {
        self.markers.clear_all(host);
    }

    fn sync_tail<H: MarkerHost + ?Sized>(&mut self, host: &mut H, row: usize) {
        self.markers.sync(host, self.classifier.states(), row, None);
    }
}
