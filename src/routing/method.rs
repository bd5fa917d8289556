//! Dispatch by request method.
//!
//! A method with no handler gets the not-found response, not
//! `405 Method Not Allowed`, and no `Allow` header is sent.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};

use crate::error::MuxError;
use crate::http::handler::{BoxResponseFuture, Handler, SharedHandler};
use crate::http::response::NotFound;

/// Flat method-to-handler table.
pub struct MethodMux {
    handlers: HashMap<Method, SharedHandler>,
    not_found: SharedHandler,
}

impl MethodMux {
    pub fn builder() -> MethodMuxBuilder {
        MethodMuxBuilder::default()
    }

    /// Builds a table from `(method name, handler)` pairs.
    ///
    /// Names are matched exactly, so `get` is an extension method distinct
    /// from `GET`. A name that is not a valid method token is an error.
    pub fn from_pairs<I, S, H>(pairs: I) -> Result<Self, MuxError>
    where
        I: IntoIterator<Item = (S, H)>,
        S: AsRef<str>,
        H: Handler,
    {
        let mut builder = Self::builder();
        for (name, handler) in pairs {
            let name = name.as_ref();
            let method = Method::from_bytes(name.as_bytes())
                .map_err(|_| MuxError::InvalidMethod(name.to_string()))?;
            builder = builder.on(method, handler);
        }
        Ok(builder.build())
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.handlers.keys()
    }

    pub fn dispatch(&self, req: Request<Body>) -> BoxResponseFuture {
        match self.handlers.get(req.method()) {
            Some(handler) => handler.call(req),
            None => {
                tracing::debug!(method = %req.method(), path = %req.uri().path(), "No handler for method");
                self.not_found.call(req)
            }
        }
    }
}

impl fmt::Debug for MethodMux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMux")
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Handler for MethodMux {
    fn call(&self, req: Request<Body>) -> BoxResponseFuture {
        self.dispatch(req)
    }
}

/// Typed builder for [`MethodMux`].
#[derive(Default)]
pub struct MethodMuxBuilder {
    handlers: HashMap<Method, SharedHandler>,
    not_found: Option<SharedHandler>,
}

impl MethodMuxBuilder {
    /// Binds `handler` to `method`, replacing any earlier binding.
    pub fn on<H: Handler>(mut self, method: Method, handler: H) -> Self {
        self.handlers.insert(method, Arc::new(handler));
        self
    }

    pub fn not_found<H: Handler>(mut self, handler: H) -> Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> MethodMux {
        MethodMux {
            handlers: self.handlers,
            not_found: self.not_found.unwrap_or_else(|| Arc::new(NotFound)),
        }
    }
}
