//! Captured path parameters and their request-scoped attachment.
//!
//! Each [`ServeMux`](super::ServeMux) owns a [`ParamKey`]. Captures are
//! stored in the request extensions under that key, so two routers in the
//! same process (or one nested inside another) never see each other's
//! values.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::Request;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Parameter name to matched segment text for a single dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Records a capture. A repeated name keeps the latest value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Capability for reading the parameters one router captured.
///
/// Obtained from [`ServeMux::param_key`](super::ServeMux::param_key) and
/// cheap to copy into handler closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamKey(u64);

impl ParamKey {
    pub(crate) fn unique() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// All parameters captured for this request by the owning router.
    pub fn params<'r, B>(&self, req: &'r Request<B>) -> Option<&'r Params> {
        req.extensions().get::<ScopedParams>()?.0.get(self)
    }

    /// Value captured under `name`, or `""` when there is none.
    pub fn value<'r, B>(&self, req: &'r Request<B>, name: &str) -> &'r str {
        self.params(req)
            .and_then(|params| params.get(name))
            .unwrap_or("")
    }

    pub(crate) fn attach<B>(&self, req: &mut Request<B>, params: Params) {
        let extensions = req.extensions_mut();
        match extensions.get_mut::<ScopedParams>() {
            Some(scoped) => {
                scoped.0.insert(*self, params);
            }
            None => {
                extensions.insert(ScopedParams(HashMap::from([(*self, params)])));
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ScopedParams(HashMap<ParamKey, Params>);

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request<()> {
        Request::builder().uri("/").body(()).unwrap()
    }

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(ParamKey::unique(), ParamKey::unique());
    }

    #[test]
    fn test_value_defaults_to_empty() {
        let key = ParamKey::unique();
        let req = request();
        assert!(key.params(&req).is_none());
        assert_eq!(key.value(&req, "id"), "");
    }

    #[test]
    fn test_routers_do_not_collide() {
        let outer = ParamKey::unique();
        let inner = ParamKey::unique();
        let mut req = request();

        let mut a = Params::new();
        a.insert("id", "1");
        outer.attach(&mut req, a);

        let mut b = Params::new();
        b.insert("id", "2");
        inner.attach(&mut req, b);

        assert_eq!(outer.value(&req, "id"), "1");
        assert_eq!(inner.value(&req, "id"), "2");
        assert_eq!(inner.value(&req, "missing"), "");
    }

    #[test]
    fn test_repeated_name_keeps_latest() {
        let mut params = Params::new();
        params.insert("id", "first");
        params.insert("id", "second");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("second"));
    }
}
