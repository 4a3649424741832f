//! Error and configuration primitives shared by the work-source crates.
#![warn(missing_docs)]

mod config;
mod error;

pub use config::CodecLimits;
pub use error::WorkSourceError;
