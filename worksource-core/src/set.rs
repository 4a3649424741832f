//! The attribution set: flat owner entries plus optional chains.

use core::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use worksource_types::{CodecLimits, WorkSourceError};

use crate::chain::AttributionChain;
use crate::diff::{EntryDiff, entries_differ, entry_diff};
use crate::parcel::{ParcelReader, ParcelWriter, Parcelable};

/// A flat `(id, name)` attribution record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributionEntry {
    /// Owner identifier.
    pub id: i32,
    /// Optional human-readable owner name. `None` and `Some("")` are distinct.
    pub name: Option<String>,
}

/// Who is responsible for a unit of work.
///
/// Behavior:
/// - Flat entries are unique by id and keep insertion order for positional
///   access ([`get`](Self::get), [`name`](Self::name)).
/// - Chains are owned by the set. Copying a set (`Clone`, [`set_from`](Self::set_from),
///   [`add_set`](Self::add_set)) always clones chains; no chain is shared between sets.
/// - Two comparisons exist and disagree on purpose: [`diff`](Self::diff) only
///   looks at flat entries, while `==` also requires identical chains in the
///   same order.
/// - Equality treats flat entries as a set keyed by id, so insertion order of
///   entries does not matter; chain order does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "SetRepr")]
pub struct AttributionSet {
    entries: Vec<AttributionEntry>,
    chains: Vec<AttributionChain>,
}

impl AttributionSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            chains: Vec::new(),
        }
    }

    /// Create a set holding a single unnamed entry.
    #[must_use]
    pub fn with_id(id: i32) -> Self {
        let mut s = Self::new();
        s.add(id);
        s
    }

    /// Create a set holding a single named entry.
    #[must_use]
    pub fn with_named(id: i32, name: &str) -> Self {
        let mut s = Self::new();
        s.add_named(id, name);
        s
    }

    /// Number of flat entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set has neither flat entries nor chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.chains.is_empty()
    }

    /// Id of the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<i32> {
        self.entries.get(index).map(|e| e.id)
    }

    /// Name of the entry at `index`, if the entry exists and is named.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).and_then(|e| e.name.as_deref())
    }

    /// Flat entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[AttributionEntry] {
        &self.entries
    }

    /// Returns true if a flat entry with `id` exists.
    #[must_use]
    pub fn contains(&self, id: i32) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Chains in insertion order.
    #[must_use]
    pub fn chains(&self) -> &[AttributionChain] {
        &self.chains
    }

    /// Mutable access to the chain at `index`.
    pub fn chain_mut(&mut self, index: usize) -> Option<&mut AttributionChain> {
        self.chains.get_mut(index)
    }

    /// The id work is billed to: the origin of the first chain when it has a
    /// node, otherwise the first flat entry.
    #[must_use]
    pub fn attribution_id(&self) -> Option<i32> {
        self.chains
            .first()
            .and_then(AttributionChain::attribution_id)
            .or_else(|| self.get(0))
    }

    /// Add an unnamed entry. Returns false if `id` was already present, in
    /// which case the existing entry is kept as is.
    pub fn add(&mut self, id: i32) -> bool {
        self.insert_entry(AttributionEntry { id, name: None })
    }

    /// Add a named entry. Returns false if `id` was already present, in
    /// which case the existing entry (and its name) is kept as is.
    pub fn add_named(&mut self, id: i32, name: &str) -> bool {
        self.insert_entry(AttributionEntry {
            id,
            name: Some(name.to_string()),
        })
    }

    /// Merge `other` into this set.
    ///
    /// Entries are de-duplicated by id. Chains of `other` not already present
    /// (by structural equality) are cloned onto the tail in `other`'s order,
    /// so merging the same set twice changes nothing the second time.
    /// Returns true if an entry or chain was added.
    pub fn add_set(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for e in &other.entries {
            changed |= self.insert_entry(e.clone());
        }
        changed | self.merge_chains(other)
    }

    /// Like [`add_set`](Self::add_set), but return the flat entries that were
    /// actually added, or `None` if every entry was already present.
    pub fn add_returning_new(&mut self, other: &Self) -> Option<Self> {
        let mut added = Self::new();
        for e in &other.entries {
            if self.insert_entry(e.clone()) {
                added.entries.push(e.clone());
            }
        }
        self.merge_chains(other);
        (!added.entries.is_empty()).then_some(added)
    }

    /// Remove every entry whose id appears in `other`, and every chain equal
    /// to one of `other`'s chains. Returns true if anything was removed.
    pub fn remove(&mut self, other: &Self) -> bool {
        let before = (self.entries.len(), self.chains.len());
        self.entries.retain(|e| !other.contains(e.id));
        self.chains.retain(|c| !other.chains.contains(c));
        before != (self.entries.len(), self.chains.len())
    }

    /// Replace the whole content with a single unnamed entry and no chains.
    pub fn set(&mut self, id: i32) {
        self.entries.clear();
        self.chains.clear();
        self.entries.push(AttributionEntry { id, name: None });
    }

    /// Replace the whole content with a single named entry and no chains.
    pub fn set_named(&mut self, id: i32, name: &str) {
        self.entries.clear();
        self.chains.clear();
        self.entries.push(AttributionEntry {
            id,
            name: Some(name.to_string()),
        });
    }

    /// Replace the whole content with a deep copy of `other`.
    ///
    /// `None` resets the set to empty (no entries, no chains).
    pub fn set_from(&mut self, other: Option<&Self>) {
        match other {
            Some(o) => self.clone_from(o),
            None => self.clear(),
        }
    }

    /// Like [`set_from`](Self::set_from), reporting which flat entries changed.
    ///
    /// Returns `None` when the flat entries are unchanged, even if chains
    /// were replaced.
    pub fn set_returning_diffs(&mut self, other: Option<&Self>) -> Option<EntryDiff> {
        let empty = Self::new();
        let diff = entry_diff(&self.entries, &other.unwrap_or(&empty).entries);
        self.set_from(other);
        if diff.is_empty() {
            return None;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            "attribution entries changed"
        );
        Some(diff)
    }

    /// Drop all entries and chains.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.chains.clear();
    }

    /// Drop all chains, keeping flat entries.
    pub fn clear_chains(&mut self) {
        self.chains.clear();
    }

    /// Append a new empty chain and return it for the caller to fill in.
    pub fn create_chain(&mut self) -> &mut AttributionChain {
        self.chains.push(AttributionChain::new());
        let [.., last] = self.chains.as_mut_slice() else {
            unreachable!("chain was just pushed");
        };
        last
    }

    /// Returns true if the flat entries of `self` and `other` differ.
    ///
    /// Chains are ignored: two sets with the same entries and entirely
    /// different chains do not diff.
    #[must_use]
    pub fn diff(&self, other: &Self) -> bool {
        entries_differ(&self.entries, &other.entries)
    }

    /// Flat entries added and removed going from `self` to `other`. Chains are ignored.
    #[must_use]
    pub fn diff_entries(&self, other: &Self) -> EntryDiff {
        entry_diff(&self.entries, &other.entries)
    }

    /// Encode into a standalone parcel.
    ///
    /// # Errors
    /// Returns `WorkSourceError::TooLarge` if a count or string length does
    /// not fit the wire format.
    pub fn to_bytes(&self) -> Result<Bytes, WorkSourceError> {
        let mut out = ParcelWriter::new();
        self.write_to_parcel(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Decode a standalone parcel with the default [`CodecLimits`].
    ///
    /// # Errors
    /// Returns a decode error if the bytes are malformed or not fully consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WorkSourceError> {
        Self::from_bytes_with_limits(bytes, CodecLimits::default())
    }

    /// Decode a standalone parcel enforcing `limits`.
    ///
    /// # Errors
    /// Returns a decode error if the bytes are malformed, exceed `limits`,
    /// or are not fully consumed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "worksource::set::from_bytes",
            skip(bytes, limits),
            fields(len = bytes.len()),
            err(level = "debug"),
        )
    )]
    pub fn from_bytes_with_limits(
        bytes: &[u8],
        limits: CodecLimits,
    ) -> Result<Self, WorkSourceError> {
        let mut input = ParcelReader::with_limits(bytes, limits);
        let set = Self::read_from_parcel(&mut input)?;
        input.finish()?;
        Ok(set)
    }

    pub(crate) fn push_entry(&mut self, entry: AttributionEntry) {
        self.entries.push(entry);
    }

    fn insert_entry(&mut self, entry: AttributionEntry) -> bool {
        if self.contains(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    fn merge_chains(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for c in &other.chains {
            if !self.chains.contains(c) {
                self.chains.push(c.clone());
                changed = true;
            }
        }
        changed
    }

    fn sorted_entries(&self) -> Vec<&AttributionEntry> {
        let mut v: Vec<&AttributionEntry> = self.entries.iter().collect();
        v.sort_unstable();
        v
    }
}

impl PartialEq for AttributionSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.chains == other.chains
            && self.sorted_entries() == other.sorted_entries()
    }
}

impl Eq for AttributionSet {}

impl Hash for AttributionSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_entries().hash(state);
        self.chains.hash(state);
    }
}

impl fmt::Display for AttributionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AttributionSet{")?;
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", e.id)?;
            if let Some(name) = &e.name {
                write!(f, " {name}")?;
            }
        }
        if !self.chains.is_empty() {
            f.write_str(" chains: [")?;
            for (i, c) in self.chains.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{c}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("}")
    }
}

impl Parcelable for AttributionSet {
    fn write_to_parcel(&self, out: &mut ParcelWriter) -> Result<(), WorkSourceError> {
        out.write_len("set.entries", self.entries.len())?;
        for e in &self.entries {
            out.write_i32(e.id);
            out.write_opt_str("entry.name", e.name.as_deref())?;
        }
        out.write_len("set.chains", self.chains.len())?;
        for c in &self.chains {
            c.write_to_parcel(out)?;
        }
        Ok(())
    }

    fn read_from_parcel(input: &mut ParcelReader<'_>) -> Result<Self, WorkSourceError> {
        let count = input.read_len("set.entries", input.limits().max_entries)?;
        let mut set = Self::new();
        // Each entry takes at least an id and a string prefix.
        set.entries.reserve(count.min(input.remaining() / 8));
        for _ in 0..count {
            let id = input.read_i32("entry.id")?;
            let name = input.read_opt_str("entry.name")?;
            if !set.insert_entry(AttributionEntry { id, name }) {
                return Err(WorkSourceError::DuplicateEntry { id });
            }
        }

        // -1 marks a sender that never created chains.
        let chain_count = match input.read_i32("set.chains")? {
            -1 => 0,
            raw => {
                let n = usize::try_from(raw).map_err(|_| WorkSourceError::NegativeLength {
                    field: "set.chains".to_string(),
                    value: raw,
                })?;
                let limit = input.limits().max_chains;
                if n > limit {
                    return Err(WorkSourceError::limit("set.chains", n, limit));
                }
                n
            }
        };
        // Each chain takes at least its node count.
        set.chains.reserve(chain_count.min(input.remaining() / 4));
        for _ in 0..chain_count {
            set.chains.push(AttributionChain::read_from_parcel(input)?);
        }
        Ok(set)
    }
}

#[derive(Deserialize)]
struct SetRepr {
    #[serde(default)]
    entries: Vec<AttributionEntry>,
    #[serde(default)]
    chains: Vec<AttributionChain>,
}

impl TryFrom<SetRepr> for AttributionSet {
    type Error = WorkSourceError;

    fn try_from(repr: SetRepr) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for e in repr.entries {
            let id = e.id;
            if !set.insert_entry(e) {
                return Err(WorkSourceError::DuplicateEntry { id });
            }
        }
        set.chains = repr.chains;
        Ok(set)
    }
}
