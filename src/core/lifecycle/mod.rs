//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Running:
//!     LifecycleCoordinator::new() → context() handed to entries
//!     listen_for_signals() → background task forwards SIGHUP/SIGINT/SIGTERM/SIGQUIT
//!
//! ShuttingDown:
//!     shutdown() (exactly once) or a signal → wait() wakes
//!
//! Terminated:
//!     wait() runs every hook once, in order → context cancelled
//! ```

pub mod context;
pub mod coordinator;
pub mod signals;

pub use context::CancelContext;
pub use coordinator::{LifecycleCoordinator, LifecycleState, ShutdownReason};
pub use signals::TerminationSignal;
