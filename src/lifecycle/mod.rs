//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Register routes → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → stop accepting → drain in-flight requests
//! ```

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
