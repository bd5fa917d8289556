//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing (registration, not-found, matches)
//! http::server (request spans via TraceLayer)
//! config::watcher (reloads)
//!     → tracing events
//!     → logging.rs subscriber (stdout)
//! ```
//!
//! # Design Decisions
//! - Unmatched requests are logged at debug, never as failures
//! - Log level configurable via config, overridden by `RUST_LOG`

pub mod logging;

pub use logging::init_logging;
