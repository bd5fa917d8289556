//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses
//! - Reject route tables the multiplexer would refuse to register
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Patterns are checked by inserting them into a scratch trie, so the
//!   rules cannot drift from the ones enforced at registration

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::{MuxConfig, RouteConfig};
use crate::error::MuxError;
use crate::routing::segment::SEPARATOR;
use crate::routing::trie::Node;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.log_level {0:?} is not a log level")]
    InvalidLogLevel(String),

    #[error("route pattern {0:?} must begin with '/'")]
    PatternNotRooted(String),

    #[error("route {pattern:?} has invalid method {method:?}")]
    InvalidMethod { pattern: String, method: String },

    #[error("route {pattern:?} is declared more than once for {method}")]
    DuplicateRoute { pattern: String, method: String },

    #[error("route {0:?} mixes method-specific and method-less entries")]
    MixedMethods(String),

    #[error(transparent)]
    Route(#[from] MuxError),
}

/// Checks `config`, collecting every problem found.
pub fn validate_config(config: &MuxConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    validate_routes(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    let mut scratch: Node<()> = Node::new();
    let mut seen = HashSet::new();
    let mut by_pattern: BTreeMap<&str, (bool, bool)> = BTreeMap::new();

    for route in routes {
        let pattern = route.pattern.as_str();

        if !pattern.starts_with(SEPARATOR) {
            errors.push(ValidationError::PatternNotRooted(pattern.to_string()));
        } else if let Err(e) = scratch.insert(pattern, ()) {
            errors.push(e.into());
        }

        if let Some(method) = route.method.as_deref() {
            if Method::from_bytes(method.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidMethod {
                    pattern: pattern.to_string(),
                    method: method.to_string(),
                });
            }
        }

        let method = route.method.as_deref().unwrap_or("any method");
        if !seen.insert((pattern, method)) {
            errors.push(ValidationError::DuplicateRoute {
                pattern: pattern.to_string(),
                method: method.to_string(),
            });
        }

        let kinds = by_pattern.entry(pattern).or_default();
        if route.method.is_some() {
            kinds.0 = true;
        } else {
            kinds.1 = true;
        }
    }

    for (pattern, (keyed, any)) in by_pattern {
        if keyed && any {
            errors.push(ValidationError::MixedMethods(pattern.to_string()));
        }
    }
}
