//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     pattern ("/users/:id")
//!     → segment.rs (split into "users", ":id")
//!     → trie.rs (walk/create nodes, bind handler at the last one)
//!
//! Dispatch:
//!     request path ("/users/42")
//!     → segment.rs (split into "users", "42")
//!     → trie.rs (literal child first, parameter child as fallback)
//!     → params.rs (captures attached to the request)
//!     → matched handler, or the not-found handler
//! ```
//!
//! # Design Decisions
//! - No priority metadata: the literal-before-parameter rule lives in the tree
//! - Exactly one segment per node, so segment counts must match
//! - No wildcards, regex constraints, or trailing-slash redirects
//! - Routes are never removed

pub mod method;
pub mod params;
pub mod router;
pub mod segment;
pub mod trie;

pub use method::{MethodMux, MethodMuxBuilder};
pub use params::{ParamKey, Params};
pub use router::{Registration, ServeMux};
