//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → routing::ServeMux (fallback for every path)
//!     → handler.rs (matched handler, e.g. responder.rs)
//!     → response.rs (not-found fallback)
//!     → Send to client
//! ```

pub mod handler;
pub mod responder;
pub mod response;
pub mod server;

pub use handler::{handler_fn, BoxResponseFuture, Handler, HandlerFn, SharedHandler};
pub use responder::TextResponder;
pub use response::{not_found, NotFound, NOT_FOUND_BODY};
pub use server::{register_routes, HttpServer};
