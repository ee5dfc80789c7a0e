//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Register routes → Freeze table → Bind
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain in-flight → Exit
//! ```
//!
//! # Design Decisions
//! - Route registration completes before the listener starts
//! - Shutdown can be triggered programmatically for tests

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
