//! Per-row block classification.
//!
//! Every document row carries exactly one [`RowState`]. A row's state depends only on its own
//! text and on whether the block is still open after the previous row, so an edit can only
//! change states from the edited row forward. [`RowClassifier::update_row`] reclassifies one row
//! and walks forward only while the change keeps cascading.

use crate::document::LineSource;
use crate::fence::FencePatterns;
use std::ops::Range;

/// Structural classification of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowState {
    /// Plain document text.
    Text,
    /// A line that opens an embedded block.
    BlockBegin,
    /// A line inside an embedded block.
    ForeignBody,
    /// A line that closes an embedded block.
    BlockEnd,
}

impl RowState {
    /// Returns `true` for every state except [`RowState::Text`].
    pub fn is_foreign(self) -> bool {
        self != Self::Text
    }

    /// Returns `true` if the block is still open after a row in this state.
    pub fn is_open(self) -> bool {
        matches!(self, Self::BlockBegin | Self::ForeignBody)
    }

    fn implied_next(self) -> Self {
        if self.is_open() {
            Self::ForeignBody
        } else {
            Self::Text
        }
    }
}

/// Classify one line given the state of the row above it (`None` for row 0).
///
/// Returns the line's own state and the default state implied for the following row.
pub fn classify_line(
    fences: &FencePatterns,
    text: &str,
    prev: Option<RowState>,
) -> (RowState, RowState) {
    let state = if fences.matches_begin(text) {
        RowState::BlockBegin
    } else if !fences.text_is_terminator() && fences.matches_end(text) {
        RowState::BlockEnd
    } else if prev.is_some_and(RowState::is_open) {
        if fences.matches_end(text) {
            RowState::BlockEnd
        } else {
            RowState::ForeignBody
        }
    } else {
        RowState::Text
    };
    (state, state.implied_next())
}

/// Classify every row of `lines` from scratch, top to bottom.
pub fn classify_document<L: LineSource + ?Sized>(
    fences: &FencePatterns,
    lines: &L,
) -> Vec<RowState> {
    let mut states = Vec::with_capacity(lines.line_count());
    let mut prev = None;
    for row in 0..lines.line_count() {
        let (state, _) = classify_line(fences, &lines.line_text(row), prev);
        states.push(state);
        prev = Some(state);
    }
    states
}

/// Owns the row-state sequence of one document.
#[derive(Debug, Clone)]
pub struct RowClassifier {
    fences: FencePatterns,
    states: Vec<RowState>,
}

impl RowClassifier {
    /// Create a classifier for an empty document.
    pub fn new(fences: FencePatterns) -> Self {
        Self {
            fences,
            states: Vec::new(),
        }
    }

    /// Create a classifier and classify every row of `lines`.
    pub fn with_lines<L: LineSource + ?Sized>(fences: FencePatterns, lines: &L) -> Self {
        let mut classifier = Self::new(fences);
        classifier.rescan(lines);
        classifier
    }

    /// Discard all states and classify `lines` from scratch.
    pub fn rescan<L: LineSource + ?Sized>(&mut self, lines: &L) {
        self.states = classify_document(&self.fences, lines);
    }

    /// The fence patterns this classifier was built with.
    pub fn fences(&self) -> &FencePatterns {
        &self.fences
    }

    /// All row states, indexed by row.
    pub fn states(&self) -> &[RowState] {
        &self.states
    }

    /// The state of `row`, if it exists.
    pub fn state(&self, row: usize) -> Option<RowState> {
        self.states.get(row).copied()
    }

    /// Number of rows tracked.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no rows are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Reclassify `row` and propagate the change to following rows.
    ///
    /// Returns the exclusive end of the rows whose stored state was written (at least
    /// `row + 1`).
    pub fn update_row<L: LineSource + ?Sized>(&mut self, lines: &L, row: usize) -> usize {
        assert!(
            row < self.states.len(),
            "row {row} out of range ({} rows)",
            self.states.len()
        );

        let terminator = self.fences.text_is_terminator();
        let mut row = row;
        let mut touched_end = row + 1;
        'walk: loop {
            let next = self.classify_in_place(lines, row);
            touched_end = touched_end.max(row + 1);

            for i in row + 1..self.states.len() {
                let current = self.states[i];

                // Openers are matched without looking at the previous row.
                if current == RowState::BlockBegin {
                    break 'walk;
                }

                if current == RowState::BlockEnd {
                    // Without terminator mode an end line is predecessor-independent. With it,
                    // the line only closes a block that is still open above it.
                    if terminator && next == RowState::Text {
                        self.states[i] = RowState::Text;
                        touched_end = touched_end.max(i + 1);
                    }
                    break 'walk;
                }

                // An end line that used to sit outside any block now closes the open one, and
                // the walk restarts from it.
                if terminator
                    && next == RowState::ForeignBody
                    && self.fences.matches_end(&lines.line_text(i))
                {
                    row = i;
                    continue 'walk;
                }

                if current == next {
                    break 'walk;
                }
                self.states[i] = next;
                touched_end = touched_end.max(i + 1);
            }
            break;
        }
        touched_end
    }

    /// Classify `rows` top-down from the state above the range, without propagating past it.
    pub(crate) fn classify_rows<L: LineSource + ?Sized>(
        &mut self,
        lines: &L,
        rows: Range<usize>,
    ) {
        assert!(
            rows.end <= self.states.len(),
            "rows {}..{} out of range ({} rows)",
            rows.start,
            rows.end,
            self.states.len()
        );
        for row in rows {
            self.classify_in_place(lines, row);
        }
    }

    fn classify_in_place<L: LineSource + ?Sized>(&mut self, lines: &L, row: usize) -> RowState {
        let prev = row.checked_sub(1).map(|r| self.states[r]);
        let (state, next) = classify_line(&self.fences, &lines.line_text(row), prev);
        self.states[row] = state;
        next
    }

    /// Insert `count` unclassified rows before `at`.
    ///
    /// The new rows hold a [`RowState::Text`] placeholder; callers must classify each of them.
    pub(crate) fn insert_rows(&mut self, at: usize, count: usize) {
        assert!(
            at <= self.states.len(),
            "insert at row {at} out of range ({} rows)",
            self.states.len()
        );
        self.states.splice(at..at, std::iter::repeat_n(RowState::Text, count));
    }

    /// Remove `count` rows starting at `at`.
    pub(crate) fn remove_rows(&mut self, at: usize, count: usize) {
        assert!(
            at + count <= self.states.len(),
            "remove rows {at}..{} out of range ({} rows)",
            at + count,
            self.states.len()
        );
        self.states.drain(at..at + count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::RowState::{BlockBegin as B, BlockEnd as E, ForeignBody as F, Text as T};
    use regex::Regex;

    fn fences(terminator: bool) -> FencePatterns {
        FencePatterns::new(
            Regex::new(r"^```\{r\}").unwrap(),
            Regex::new(r"^```$").unwrap(),
            terminator,
        )
    }

    #[test]
    fn test_classify_line_rules() {
        let f = fences(false);
        assert_eq!(classify_line(&f, "```{r}", None), (B, F));
        assert_eq!(classify_line(&f, "```", None), (E, T));
        assert_eq!(classify_line(&f, "1+1", Some(B)), (F, F));
        assert_eq!(classify_line(&f, "1+1", Some(E)), (T, T));
        assert_eq!(classify_line(&f, "1+1", None), (T, T));

        let f = fences(true);
        assert_eq!(classify_line(&f, "```", None), (T, T));
        assert_eq!(classify_line(&f, "```", Some(T)), (T, T));
        assert_eq!(classify_line(&f, "```", Some(F)), (E, T));
        assert_eq!(classify_line(&f, "```{r}", Some(F)), (B, F));
    }

    #[test]
    fn test_classify_document() {
        let lines = vec!["x", "```{r}", "1+1", "```", "y"];
        assert_eq!(classify_document(&fences(false), &lines), vec![T, B, F, E, T]);
        assert_eq!(classify_document(&fences(true), &lines), vec![T, B, F, E, T]);

        let empty: Vec<&str> = Vec::new();
        assert!(classify_document(&fences(false), &empty).is_empty());
    }

    #[test]
    fn test_update_row_propagates_open_block() {
        let mut lines = vec!["x", "a", "b", "c"];
        let mut classifier = RowClassifier::with_lines(fences(false), &lines);
        assert_eq!(classifier.states(), &[T, T, T, T]);

        lines[1] = "```{r}";
        let end = classifier.update_row(&lines, 1);
        assert_eq!(classifier.states(), &[T, B, F, F]);
        assert_eq!(end, 4);
    }

    #[test]
    fn test_update_row_stops_at_fixpoint() {
        let mut lines = vec!["```{r}", "a", "b", "c"];
        let mut classifier = RowClassifier::with_lines(fences(false), &lines);

        lines[2] = "bb";
        let end = classifier.update_row(&lines, 2);
        assert_eq!(classifier.states(), &[B, F, F, F]);
        assert_eq!(end, 3);
    }

    #[test]
    fn test_terminator_mode_downgrades_stale_end() {
        let mut lines = vec!["```{r}", "a", "```", "b"];
        let mut classifier = RowClassifier::with_lines(fences(true), &lines);
        assert_eq!(classifier.states(), &[B, F, E, T]);

        lines[0] = "text";
        let end = classifier.update_row(&lines, 0);
        assert_eq!(classifier.states(), &[T, T, T, T]);
        assert_eq!(end, 3);
    }

    #[test]
    fn test_terminator_mode_reenters_for_end_line() {
        let mut lines = vec!["x", "a", "```", "b"];
        let mut classifier = RowClassifier::with_lines(fences(true), &lines);
        assert_eq!(classifier.states(), &[T, T, T, T]);

        lines[0] = "```{r}";
        let end = classifier.update_row(&lines, 0);
        assert_eq!(classifier.states(), &[B, F, E, T]);
        assert_eq!(end, 3);
        assert_eq!(classifier.states(), classify_document(&fences(true), &lines));
    }

    #[test]
    fn test_splices_keep_placeholders_until_classified() {
        let mut lines = vec!["```{r}", "a", "```"];
        let mut classifier = RowClassifier::with_lines(fences(false), &lines);

        lines.insert(1, "```{r}");
        lines.insert(2, "z");
        classifier.insert_rows(1, 2);
        assert_eq!(classifier.len(), 5);
        classifier.update_row(&lines, 1);
        classifier.update_row(&lines, 2);
        assert_eq!(classifier.states(), classify_document(&fences(false), &lines));

        lines.drain(0..2);
        classifier.remove_rows(0, 2);
        classifier.update_row(&lines, 0);
        assert_eq!(classifier.states(), &[T, T, E]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_update_row_out_of_range_panics() {
        let lines = vec!["x"];
        let mut classifier = RowClassifier::with_lines(fences(false), &lines);
        classifier.update_row(&lines, 1);
    }

    #[test]
    fn test_overlapping_fences_walk_without_recursion() {
        // Every line matches both patterns, so each placeholder re-enters the walk.
        let fences = FencePatterns::new(
            Regex::new(r"^```").unwrap(),
            Regex::new(r"^```$").unwrap(),
            true,
        );
        let lines = vec!["```"; 200_000];
        let mut classifier = RowClassifier::new(fences);
        classifier.insert_rows(0, lines.len());

        let end = classifier.update_row(&lines, 0);
        assert_eq!(end, lines.len());
        assert!(classifier.states().iter().all(|&state| state == B));
    }

    #[test]
    fn test_classify_rows_then_propagate_matches_rescan() {
        let mut lines = vec!["x", "```{r}", "a", "```", "y"];
        let f = fences(true);
        let mut classifier = RowClassifier::with_lines(f.clone(), &lines);

        let pasted = ["```{r}", "b", "```", "```{r}", "c"];
        for (offset, line) in pasted.iter().enumerate() {
            lines.insert(1 + offset, *line);
        }
        classifier.insert_rows(1, pasted.len());
        classifier.classify_rows(&lines, 1..1 + pasted.len());
        classifier.update_row(&lines, pasted.len());

        assert_eq!(classifier.states(), classify_document(&f, &lines));
        assert_eq!(classifier.states(), &[T, B, F, E, B, F, B, F, E, T]);
    }

}
