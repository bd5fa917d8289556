//! Segment-trie HTTP request multiplexer.
//!
//! Patterns are `/`-delimited; a segment starting with `:` captures one
//! path segment under its name. Literal segments take precedence over a
//! capture at the same position.
//!
//! ```
//! use path_mux::{handler_fn, ServeMux};
//!
//! let mux = ServeMux::new();
//! let params = mux.param_key();
//! mux.handle("/users/new", handler_fn(|_req| async { "new user form" })).unwrap();
//! mux.handle(
//!     "/users/:id",
//!     handler_fn(move |req| {
//!         let id = params.value(&req, "id").to_string();
//!         async move { format!("user {id}") }
//!     }),
//! )
//! .unwrap();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::MuxConfig;
pub use error::MuxError;
pub use http::{handler_fn, Handler, HttpServer, SharedHandler};
pub use lifecycle::Shutdown;
pub use routing::{MethodMux, ParamKey, Params, Registration, ServeMux};
