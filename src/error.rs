//! Setup-time errors.
//!
//! Every variant is a programmer or configuration mistake detected while the
//! route table is being built. Dispatch never produces one of these: an
//! unmatched path is a normal outcome routed to the not-found handler.

use thiserror::Error;

/// Errors raised while registering routes or building a method table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MuxError {
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// A node may declare only one placeholder child.
    #[error("pattern {pattern:?} declares placeholder {placeholder:?} where {existing:?} is already registered")]
    ParamConflict {
        pattern: String,
        existing: String,
        placeholder: String,
    },

    #[error("invalid method name {0:?}")]
    InvalidMethod(String),
}
