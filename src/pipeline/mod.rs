//! Ordered key-value pipeline.
//!
//! # Data Flow
//! ```text
//! Vec / JSON text / query pairs / route list
//!     → Stream<K, V> (ordered entries, unique keys)
//!     → transformations (add, map, filter, reject, on_each) return the stream
//!     → terminals (first, all, any, none, fold, reduce, partition, chunked,
//!       into_entries) return plain values
//! ```
//!
//! # Design Decisions
//! - Eager: every operation runs to completion when called
//! - Builder style: transformations take `self` and hand it back, so a
//!   chain never aliases an earlier step
//! - Keys survive map/filter/reject so consumers can still address entries
//! - Predicates that do not yield a boolean fail with `InvariantViolation`

pub mod stream;
pub mod verdict;

use thiserror::Error;

pub use stream::Stream;
pub use verdict::Verdict;

/// Errors raised by stream operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A predicate produced something other than a boolean.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The caller passed an argument outside the accepted range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
