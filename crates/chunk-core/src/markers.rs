//! Row markers (background overlays) data model.
//!
//! Markers are UI-facing overlays anchored to whole rows. The highlighter never renders them; it
//! asks a [`MarkerHost`] to create and remove them, and the host decides how a marker's class and
//! kind map to colors.

use std::collections::BTreeMap;
use std::ops::Range;

/// Opaque handle of a marker owned by a [`MarkerHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Filled background behind the text of the covered rows.
    Background,
    /// Full-width line highlight.
    FullLine,
    /// Highlight of the covered text only.
    Text,
}

/// A marker as reported by [`MarkerHost::markers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The marker handle.
    pub id: MarkerId,
    /// Covered rows (half-open).
    pub rows: Range<usize>,
    /// Space-separated style classes.
    pub class: String,
    /// Draw kind.
    pub kind: MarkerKind,
    /// Whether the marker is drawn in front of the text.
    pub in_front: bool,
}

/// The overlay subsystem a highlighter draws into.
pub trait MarkerHost {
    /// Create a marker and return its handle.
    fn add_marker(
        &mut self,
        rows: Range<usize>,
        class: &str,
        kind: MarkerKind,
        in_front: bool,
    ) -> MarkerId;

    /// Remove a marker. Unknown handles are ignored.
    fn remove_marker(&mut self, id: MarkerId);

    /// Enumerate existing markers drawn behind (`in_front == false`) or in front of the text.
    fn markers(&self, in_front: bool) -> Vec<Marker>;
}

/// Counters of marker operations performed on a [`MarkerRegistry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerStats {
    /// Markers created.
    pub added: usize,
    /// Markers removed.
    pub removed: usize,
}

/// An in-memory [`MarkerHost`].
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: BTreeMap<MarkerId, Marker>,
    next_id: u64,
    stats: MarkerStats,
}

impl MarkerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if no markers are live.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Look up a marker by handle.
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Iterate live markers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// Sorted start rows of the live markers carrying every class token in `class`.
    pub fn rows_with_class(&self, class: &str) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .markers
            .values()
            .filter(|m| has_class_tokens(&m.class, class))
            .map(|m| m.rows.start)
            .collect();
        rows.sort_unstable();
        rows
    }

    /// Operation counters since creation (or the last [`MarkerRegistry::reset_stats`]).
    pub fn stats(&self) -> MarkerStats {
        self.stats
    }

    /// Reset the operation counters.
    pub fn reset_stats(&mut self) {
        self.stats = MarkerStats::default();
    }
}

impl MarkerHost for MarkerRegistry {
    fn add_marker(
        &mut self,
        rows: Range<usize>,
        class: &str,
        kind: MarkerKind,
        in_front: bool,
    ) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            Marker {
                id,
                rows,
                class: class.to_string(),
                kind,
                in_front,
            },
        );
        self.stats.added += 1;
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.stats.removed += 1;
        }
    }

    fn markers(&self, in_front: bool) -> Vec<Marker> {
        self.markers
            .values()
            .filter(|m| m.in_front == in_front)
            .cloned()
            .collect()
    }
}

/// Returns `true` if every whitespace-separated token of `required` is a token of `class`.
pub(crate) fn has_class_tokens(class: &str, required: &str) -> bool {
    required
        .split_whitespace()
        .all(|token| class.split_whitespace().any(|candidate| candidate == token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_add_remove() {
        let mut registry = MarkerRegistry::new();
        let a = registry.add_marker(3..4, "foreign_line", MarkerKind::Background, false);
        let b = registry.add_marker(
            1..2,
            "foreign_line chunk_start",
            MarkerKind::Background,
            false,
        );
        let c = registry.add_marker(0..1, "selection", MarkerKind::Text, true);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.rows_with_class("foreign_line"), vec![1, 3]);
        assert_eq!(registry.markers(false).len(), 2);
        assert_eq!(registry.markers(true)[0].id, c);

        registry.remove_marker(a);
        registry.remove_marker(a);
        assert_eq!(registry.len(), 2);
        assert!(registry.get(a).is_none());
        assert_eq!(registry.get(b).map(|m| m.rows.clone()), Some(1..2));
        assert_eq!(
            registry.stats(),
            MarkerStats {
                added: 3,
                removed: 1
            }
        );

        registry.reset_stats();
        assert_eq!(registry.stats(), MarkerStats::default());
    }

    #[test]
    fn test_class_tokens_match_whole_words() {
        assert!(has_class_tokens("foreign_line chunk_background", "chunk_background"));
        assert!(has_class_tokens(
            "foreign_line chunk_background chunk_start",
            "foreign_line  chunk_background"
        ));
        assert!(!has_class_tokens("embedded_other", "embedded"));
        assert!(!has_class_tokens("foreign_line", "foreign_line chunk_background"));

        let mut registry = MarkerRegistry::new();
        registry.add_marker(0..1, "embedded", MarkerKind::Background, false);
        registry.add_marker(1..2, "embedded_other", MarkerKind::Background, false);
        assert_eq!(registry.rows_with_class("embedded"), vec![0]);
    }

}
