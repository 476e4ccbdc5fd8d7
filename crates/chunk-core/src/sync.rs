//! Keeps one marker per foreign row.
//!
//! [`MarkerSynchronizer`] owns the row -> marker map. A sync pass over a row range makes the
//! map's domain equal to the set of non-[`RowState::Text`] rows in that range.

use crate::markers::{MarkerHost, MarkerId, MarkerKind, has_class_tokens};
use crate::row_state::RowState;

/// Classes and kind used for the markers a synchronizer creates (and adopts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Class of every foreign-row marker; also the adoption filter.
    pub class: String,
    /// Extra class appended for block-opening rows.
    pub chunk_start_class: String,
    /// Draw kind of created markers.
    pub kind: MarkerKind,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            class: "foreign_line chunk_background".to_string(),
            chunk_start_class: "chunk_start".to_string(),
            kind: MarkerKind::Background,
        }
    }
}

/// Owns the row -> marker map of one document.
#[derive(Debug, Clone)]
pub struct MarkerSynchronizer {
    style: MarkerStyle,
    start_class: String,
    markers: Vec<Option<MarkerId>>,
}

impl MarkerSynchronizer {
    /// Create a synchronizer that owns no markers yet.
    pub fn new(style: MarkerStyle) -> Self {
        let start_class = format!("{} {}", style.class, style.chunk_start_class);
        Self {
            style,
            start_class,
            markers: Vec::new(),
        }
    }

    /// The marker style.
    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// The marker currently recorded for `row`.
    pub fn marker(&self, row: usize) -> Option<MarkerId> {
        self.markers.get(row).copied().flatten()
    }

    /// Number of markers owned.
    pub fn marker_count(&self) -> usize {
        self.markers.iter().flatten().count()
    }

    /// Take ownership of markers left in `host` by a previous synchronizer with the same style.
    ///
    /// Returns the number of markers adopted. A marker whose row already holds an adopted marker
    /// replaces it, and the replaced one is removed from the host.
    pub fn adopt<H: MarkerHost + ?Sized>(&mut self, host: &mut H, line_count: usize) -> usize {
        let mut adopted = 0;
        for marker in host.markers(false) {
            if marker.kind != self.style.kind
                || !has_class_tokens(&marker.class, &self.style.class)
            {
                continue;
            }
            let row = marker.rows.start;
            assert!(
                row < line_count,
                "adopted marker row {row} out of range ({line_count} rows)"
            );
            self.ensure_len(row + 1);
            if let Some(previous) = self.markers[row].replace(marker.id) {
                host.remove_marker(previous);
            }
            adopted += 1;
        }
        tracing::debug!(adopted, "adopted existing chunk markers");
        adopted
    }

    /// Reconcile markers with `states` from `start_row` through `start_row + rows_changed`
    /// (inclusive, clamped), or through the last row when `rows_changed` is `None`.
    ///
    /// A pass that starts on a [`RowState::BlockEnd`] row always runs to the end of the document.
    pub fn sync<H: MarkerHost + ?Sized>(
        &mut self,
        host: &mut H,
        states: &[RowState],
        start_row: usize,
        rows_changed: Option<usize>,
    ) {
        let Some(last_row) = states.len().checked_sub(1) else {
            self.clear_all(host);
            return;
        };
        assert!(
            start_row <= last_row,
            "sync start row {start_row} out of range ({} rows)",
            states.len()
        );

        let mut end_row = match rows_changed {
            Some(count) => start_row.saturating_add(count).min(last_row),
            None => last_row,
        };
        if states[start_row] == RowState::BlockEnd && end_row < last_row {
            tracing::debug!(start_row, end_row, "block end: syncing markers to document tail");
            end_row = last_row;
        }

        self.ensure_len(end_row + 1);
        for (row, &state) in states.iter().enumerate().take(end_row + 1).skip(start_row) {
            if let Some(id) = self.markers[row].take() {
                host.remove_marker(id);
            }
            if state.is_foreign() {
                let class = if state == RowState::BlockBegin {
                    &self.start_class
                } else {
                    &self.style.class
                };
                let id = host.add_marker(row..row + 1, class, self.style.kind, false);
                self.markers[row] = Some(id);
            }
        }

        if end_row == last_row {
            self.release_from(host, states.len());
        }
    }

    /// Remove every owned marker from `host`.
    pub fn clear_all<H: MarkerHost + ?Sized>(&mut self, host: &mut H) {
        self.release_from(host, 0);
    }

    fn release_from<H: MarkerHost + ?Sized>(&mut self, host: &mut H, row: usize) {
        if self.markers.len() <= row {
            return;
        }
        for id in self.markers.drain(row..).flatten() {
            host.remove_marker(id);
        }
    }

    fn ensure_len(&mut self, len: usize) {
        if self.markers.len() < len {
            self.markers.resize(len, None);
        }
    }
}
