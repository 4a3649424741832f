//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// Upper bounds a parcel decoder enforces before allocating.
///
/// Counts and lengths on the wire are attacker-controlled; a reader rejects
/// any value above these limits with [`crate::WorkSourceError::LimitExceeded`]
/// instead of reserving memory for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecLimits {
    /// Maximum number of flat entries in one attribution set.
    pub max_entries: usize,
    /// Maximum number of chains in one attribution set.
    pub max_chains: usize,
    /// Maximum number of nodes in one chain.
    pub max_chain_nodes: usize,
    /// Maximum encoded length of a single name or tag, in bytes.
    pub max_string_bytes: usize,
}

impl CodecLimits {
    /// Limits that accept anything the wire format can express.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_entries: usize::MAX,
            max_chains: usize::MAX,
            max_chain_nodes: usize::MAX,
            max_string_bytes: usize::MAX,
        }
    }
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_entries: 4096,
            max_chains: 1024,
            max_chain_nodes: 256,
            max_string_bytes: 4096,
        }
    }
}
