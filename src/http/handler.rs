//! Handler abstraction shared by every router in the crate.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

/// Future returned by every [`Handler`].
pub type BoxResponseFuture = BoxFuture<'static, Response>;

/// Something that turns a request into a response.
///
/// The returned future must not borrow the handler, so a router can release
/// its lock before the future is polled.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>) -> BoxResponseFuture;
}

/// Reference-counted handler as stored in route tables.
pub type SharedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, req: Request<Body>) -> BoxResponseFuture {
        (**self).call(req)
    }
}

/// Handler backed by an async function or closure.
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps `f` as a [`Handler`].
///
/// ```
/// use path_mux::{handler_fn, ServeMux};
///
/// let mux = ServeMux::new();
/// let params = mux.param_key();
/// mux.handle(
///     "/hello/:name",
///     handler_fn(move |req| {
///         let name = params.value(&req, "name").to_string();
///         async move { format!("hello {name}") }
///     }),
/// )
/// .unwrap();
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    HandlerFn { f }
}

impl<F, Fut, R> Handler for HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request<Body>) -> BoxResponseFuture {
        let fut = (self.f)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
