//! Chain-blind comparison of flat entries, used for change notification.

use crate::set::{AttributionEntry, AttributionSet};

/// Flat entries that changed between two attribution sets.
///
/// The comparison is asymmetric: `added` holds entries present only in the
/// newer set, `removed` those present only in the older one. Chains never
/// take part; callers that watch for ownership changes predate chains and
/// rely on that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDiff {
    /// Entries of the newer set missing from the older one.
    pub added: AttributionSet,
    /// Entries of the older set missing from the newer one.
    pub removed: AttributionSet,
}

impl EntryDiff {
    /// Returns true if no flat entry was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.entries().is_empty() && self.removed.entries().is_empty()
    }
}

/// Compare `old` against `new` by `(id, name)` pairs.
///
/// An id whose name changed shows up once in `removed` (old name) and once
/// in `added` (new name).
pub(crate) fn entry_diff(old: &[AttributionEntry], new: &[AttributionEntry]) -> EntryDiff {
    let mut out = EntryDiff::default();
    for e in new.iter().filter(|e| !old.contains(e)) {
        out.added.push_entry(e.clone());
    }
    for e in old.iter().filter(|e| !new.contains(e)) {
        out.removed.push_entry(e.clone());
    }
    out
}

/// Cheap form of [`entry_diff`] that stops at the first difference.
pub(crate) fn entries_differ(old: &[AttributionEntry], new: &[AttributionEntry]) -> bool {
    old.len() != new.len() || old.iter().any(|e| !new.contains(e))
}
