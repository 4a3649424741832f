//! worksource-core
//!
//! Attribution tracking for resource accounting: who is responsible for a
//! unit of work.
//!
//! - `set`: [`AttributionSet`], flat `(id, name)` owners plus optional chains.
//! - `chain`: [`AttributionChain`], an ordered multi-hop attribution path.
//! - `diff`: [`EntryDiff`], the chain-blind entry comparison used for change
//!   notification.
//! - `parcel`: the byte codec used to ship sets between processes.
//!
//! Logging
//! -------
//! With the `tracing` feature enabled, parcel decoding is instrumented and
//! entry changes applied through [`AttributionSet::set_returning_diffs`]
//! emit debug events.
#![warn(missing_docs)]

/// Ordered multi-hop attribution paths.
pub mod chain;
/// Entry-level change detection.
pub mod diff;
/// Length-prefixed byte codec.
pub mod parcel;
/// Attribution sets.
pub mod set;

pub use chain::{AttributionChain, ChainNode};
pub use diff::EntryDiff;
pub use parcel::{ParcelReader, ParcelWriter, Parcelable};
pub use set::{AttributionEntry, AttributionSet};
pub use worksource_types::{CodecLimits, WorkSourceError};
