//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Own the segment trie behind a reader/writer lock
//! - Register handlers, reporting created vs replaced
//! - Resolve a request, attach its captures, invoke the handler
//! - Fall back to the not-found handler when nothing matches
//!
//! # Design Decisions
//! - Registration takes the lock exclusively; dispatch takes it shared
//! - The lock is released before the handler runs, never held across an await
//! - Captures are only attached when there is at least one
//! - Paths are matched after percent-decoding, so captures hold decoded text
//!   and an encoded `%2F` separates segments

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::body::Body;
use axum::http::Request;
use percent_encoding::percent_decode_str;

use crate::error::MuxError;
use crate::http::handler::{BoxResponseFuture, Handler, SharedHandler};
use crate::http::response::NotFound;
use crate::routing::params::ParamKey;
use crate::routing::segment::SEPARATOR;
use crate::routing::trie::Node;

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    Replaced,
}

impl Registration {
    fn from_created(created: bool) -> Self {
        if created {
            Self::Created
        } else {
            Self::Replaced
        }
    }
}

fn rooted(pattern: &str) -> Result<(), MuxError> {
    if pattern.starts_with(SEPARATOR) {
        Ok(())
    } else {
        Err(MuxError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "pattern must begin with '/'",
        })
    }
}

/// Request multiplexer over `/`-delimited patterns with `:name` captures.
pub struct ServeMux {
    key: ParamKey,
    trie: RwLock<Node<SharedHandler>>,
    not_found: SharedHandler,
}

impl ServeMux {
    pub fn new() -> Self {
        Self {
            key: ParamKey::unique(),
            trie: RwLock::new(Node::new()),
            not_found: Arc::new(NotFound),
        }
    }

    /// Replaces the handler invoked for unmatched paths.
    pub fn with_not_found<H: Handler>(mut self, handler: H) -> Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Accessor for the parameters this router captures.
    pub fn param_key(&self) -> ParamKey {
        self.key
    }

    /// Registers `handler` for `pattern`. A repeated pattern replaces the
    /// previous handler.
    pub fn handle<H: Handler>(&self, pattern: &str, handler: H) -> Result<Registration, MuxError> {
        self.handle_shared(pattern, Arc::new(handler))
    }

    pub fn handle_shared(
        &self,
        pattern: &str,
        handler: SharedHandler,
    ) -> Result<Registration, MuxError> {
        rooted(pattern)?;
        let registration = Registration::from_created(self.write().insert(pattern, handler)?);

        tracing::info!(pattern, ?registration, "Route registered");
        Ok(registration)
    }

    /// Registers every `(pattern, handler)` pair, or none of them.
    ///
    /// Each pattern is checked against the live tree and against the rest of
    /// the batch before anything is inserted. The write lock is held for the
    /// whole batch, so dispatch never observes half of it.
    pub fn handle_all<I, P>(&self, routes: I) -> Result<Vec<Registration>, MuxError>
    where
        I: IntoIterator<Item = (P, SharedHandler)>,
        P: AsRef<str>,
    {
        let routes: Vec<(P, SharedHandler)> = routes.into_iter().collect();

        let mut trie = self.write();
        let mut batch: Node<()> = Node::new();
        for (pattern, _) in &routes {
            let pattern = pattern.as_ref();
            rooted(pattern)?;
            trie.check(pattern)?;
            batch.insert(pattern, ())?;
        }

        let mut registrations = Vec::with_capacity(routes.len());
        for (pattern, handler) in routes {
            let pattern = pattern.as_ref();
            let registration = Registration::from_created(trie.insert(pattern, handler)?);
            tracing::info!(pattern, ?registration, "Route registered");
            registrations.push(registration);
        }
        Ok(registrations)
    }

    /// Handler registered for exactly `path`, without capturing. `path` is
    /// matched as given, not percent-decoded.
    pub fn handler(&self, path: &str) -> Option<SharedHandler> {
        self.read().get(path).cloned()
    }

    /// Routes `req` to its handler, or to the not-found handler.
    pub fn dispatch(&self, mut req: Request<Body>) -> BoxResponseFuture {
        let (handler, params) = {
            let path = percent_decode_str(req.uri().path()).decode_utf8_lossy();
            let trie = self.read();
            let (handler, params) = trie.get_with_params(&path);
            (handler.cloned(), params)
        };

        let Some(handler) = handler else {
            tracing::debug!(path = %req.uri().path(), "No route matched");
            return self.not_found.call(req);
        };

        tracing::trace!(
            path = %req.uri().path(),
            params = params.len(),
            "Route matched"
        );

        if !params.is_empty() {
            self.key.attach(&mut req, params);
        }
        handler.call(req)
    }

    /// Parameter captured by this router for `req`, or `""`.
    pub fn param_value<'r, B>(&self, req: &'r Request<B>, name: &str) -> &'r str {
        self.key.value(req, name)
    }

    // A panicking handler never runs under the lock, so a poisoned lock
    // still guards a consistent tree.
    fn read(&self) -> RwLockReadGuard<'_, Node<SharedHandler>> {
        self.trie.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Node<SharedHandler>> {
        self.trie.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServeMux {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServeMux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServeMux").field("key", &self.key).finish_non_exhaustive()
    }
}

impl Handler for ServeMux {
    fn call(&self, req: Request<Body>) -> BoxResponseFuture {
        self.dispatch(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::handler_fn;
    use crate::http::response::NOT_FOUND_BODY;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    async fn body_of(mux: &ServeMux, path: &str) -> String {
        let res = mux.dispatch(get(path)).await;
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn text(body: &'static str) -> impl Handler {
        handler_fn(move |_req: Request<Body>| async move { body })
    }

    fn shared(body: &'static str) -> SharedHandler {
        Arc::new(text(body))
    }

    #[tokio::test]
    async fn test_dispatch_captures_param() {
        let mux = ServeMux::new();
        let key = mux.param_key();
        mux.handle(
            "/users/:id",
            handler_fn(move |req: Request<Body>| {
                let id = key.value(&req, "id").to_string();
                async move { format!("user {id}") }
            }),
        )
        .unwrap();

        assert_eq!(body_of(&mux, "/users/42").await, "user 42");
    }

    #[tokio::test]
    async fn test_literal_route_wins_over_param() {
        let mux = ServeMux::new();
        mux.handle("/users/:id", text("h1")).unwrap();
        mux.handle("/users/new", text("h2")).unwrap();

        assert_eq!(body_of(&mux, "/users/new").await, "h2");
        assert_eq!(body_of(&mux, "/users/7").await, "h1");
    }

    #[tokio::test]
    async fn test_empty_router_falls_back() {
        let mux = ServeMux::new();
        let res = mux.dispatch(get("/anything")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_reregistration_replaces() {
        let mux = ServeMux::new();
        assert_eq!(mux.handle("/a", text("old")).unwrap(), Registration::Created);
        assert_eq!(mux.handle("/a", text("new")).unwrap(), Registration::Replaced);
        assert_eq!(body_of(&mux, "/a").await, "new");
    }

    #[tokio::test]
    async fn test_segment_count_mismatch_is_not_found() {
        let mux = ServeMux::new();
        mux.handle("/a/:id", text("a")).unwrap();
        assert_eq!(body_of(&mux, "/a").await, NOT_FOUND_BODY);
        assert_eq!(body_of(&mux, "/a/1/2").await, NOT_FOUND_BODY);
    }

    #[tokio::test]
    async fn test_trailing_slash_routes_are_independent() {
        let mux = ServeMux::new();
        mux.handle("/a", text("plain")).unwrap();
        mux.handle("/a/", text("slash")).unwrap();
        assert_eq!(body_of(&mux, "/a").await, "plain");
        assert_eq!(body_of(&mux, "/a/").await, "slash");
    }

    #[tokio::test]
    async fn test_no_params_attached_without_captures() {
        let mux = ServeMux::new();
        let key = mux.param_key();
        mux.handle(
            "/static",
            handler_fn(move |req: Request<Body>| {
                let attached = key.params(&req).is_some();
                async move { attached.to_string() }
            }),
        )
        .unwrap();
        assert_eq!(body_of(&mux, "/static").await, "false");
    }

    #[tokio::test]
    async fn test_custom_not_found() {
        let mux = ServeMux::new().with_not_found(text("custom"));
        assert_eq!(body_of(&mux, "/missing").await, "custom");
    }

    #[tokio::test]
    async fn test_nested_routers_keep_their_own_params() {
        let inner = Arc::new(ServeMux::new());
        let outer = ServeMux::new();
        let (outer_key, inner_key) = (outer.param_key(), inner.param_key());

        inner
            .handle(
                "/:name/:id",
                handler_fn(move |req: Request<Body>| {
                    let body = format!(
                        "outer={} inner={}",
                        outer_key.value(&req, "id"),
                        inner_key.value(&req, "id")
                    );
                    async move { body }
                }),
            )
            .unwrap();
        outer.handle("/:id/items", inner.clone()).unwrap();

        assert_eq!(body_of(&outer, "/a/items").await, "outer=a inner=items");
        assert_eq!(outer.param_value(&get("/a/items"), "id"), "");
    }

    #[test]
    fn test_plain_lookup() {
        let mux = ServeMux::new();
        mux.handle("/users/:id", text("h")).unwrap();
        assert!(mux.handler("/users/1").is_some());
        assert!(mux.handler("/users").is_none());
    }

    #[test]
    fn test_unrooted_pattern_is_rejected() {
        let mux = ServeMux::new();
        assert!(matches!(
            mux.handle("users", text("x")),
            Err(MuxError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_conflicting_placeholder_is_rejected() {
        let mux = ServeMux::new();
        mux.handle("/users/:id", text("a")).unwrap();
        assert!(matches!(
            mux.handle("/users/:name", text("b")),
            Err(MuxError::ParamConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_captures_are_percent_decoded() {
        let mux = ServeMux::new();
        let key = mux.param_key();
        mux.handle(
            "/users/:id",
            handler_fn(move |req: Request<Body>| {
                let id = key.value(&req, "id").to_string();
                async move { format!("user={id}") }
            }),
        )
        .unwrap();
        mux.handle("/café", text("literal")).unwrap();

        assert_eq!(body_of(&mux, "/users/a%20b").await, "user=a b");
        assert_eq!(body_of(&mux, "/caf%C3%A9").await, "literal");
        // Decoded `/` adds a segment.
        assert_eq!(body_of(&mux, "/users/a%2Fb").await, NOT_FOUND_BODY);
    }

    #[test]
    fn test_handle_all_registers_batch() {
        let mux = ServeMux::new();
        mux.handle("/a", text("a")).unwrap();

        let batch: Vec<(&str, SharedHandler)> = vec![
            ("/a", shared("a2")),
            ("/b/:id", shared("b")),
        ];
        assert_eq!(
            mux.handle_all(batch).unwrap(),
            vec![Registration::Replaced, Registration::Created]
        );
        assert!(mux.handler("/b/1").is_some());
    }

    #[tokio::test]
    async fn test_handle_all_conflict_with_live_tree_registers_nothing() {
        let mux = ServeMux::new();
        mux.handle("/users/:id", text("by id")).unwrap();

        let batch: Vec<(&str, SharedHandler)> = vec![
            ("/aaa", shared("aaa")),
            ("/users/:uid", shared("by uid")),
        ];
        assert!(matches!(
            mux.handle_all(batch),
            Err(MuxError::ParamConflict { .. })
        ));
        assert_eq!(body_of(&mux, "/aaa").await, NOT_FOUND_BODY);
        assert_eq!(body_of(&mux, "/users/1").await, "by id");
    }

    #[test]
    fn test_handle_all_conflict_within_batch_registers_nothing() {
        let mux = ServeMux::new();
        let batch: Vec<(&str, SharedHandler)> = vec![
            ("/x/:a", shared("a")),
            ("/ok", shared("ok")),
            ("/x/:b/y", shared("b")),
        ];
        assert!(mux.handle_all(batch).is_err());
        assert!(mux.handler("/ok").is_none());
        assert!(mux.handler("/x/1").is_none());
    }

    #[test]
    fn test_handle_all_rejects_unrooted() {
        let mux = ServeMux::new();
        let batch: Vec<(&str, SharedHandler)> =
            vec![("/fine", shared("f")), ("nope", shared("n"))];
        assert!(matches!(
            mux.handle_all(batch),
            Err(MuxError::InvalidPattern { .. })
        ));
        assert!(mux.handler("/fine").is_none());
    }
}
