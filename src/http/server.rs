//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the `ServeMux` from the configured route table
//! - Mount it as the Axum fallback so it sees every request path
//! - Wire up middleware (tracing, timeout)
//! - Apply reloaded route tables while serving

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{validate_config, ConfigError, MuxConfig, RouteConfig};
use crate::error::MuxError;
use crate::http::handler::SharedHandler;
use crate::http::responder::TextResponder;
use crate::lifecycle::ShutdownSignal;
use crate::routing::{MethodMux, Registration, ServeMux};

/// HTTP server hosting a single [`ServeMux`].
pub struct HttpServer {
    router: Router,
    mux: Arc<ServeMux>,
    config: MuxConfig,
}

impl HttpServer {
    /// Create a server whose multiplexer holds the configured routes.
    ///
    /// `config` is validated first; every problem found is returned.
    pub fn new(config: MuxConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let mux = Arc::new(ServeMux::new());
        let created = register_routes(&mux, &config.routes)?;
        tracing::info!(routes = created, "Route table built");
        Ok(Self::with_mux(config, mux))
    }

    /// Create a server around an existing multiplexer. Routes in `config`
    /// are not registered.
    pub fn with_mux(config: MuxConfig, mux: Arc<ServeMux>) -> Self {
        let router = Self::build_router(&config, mux.clone());
        Self {
            router,
            mux,
            config,
        }
    }

    #[allow(deprecated)]
    fn build_router(config: &MuxConfig, mux: Arc<ServeMux>) -> Router {
        Router::new()
            .fallback(move |request: Request<Body>| mux.dispatch(request))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run until `shutdown` fires, applying every config received on
    /// `config_updates` to the live route table.
    ///
    /// Only routes are reloaded; listener and timeout settings keep the
    /// values the server was started with.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<MuxConfig>,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mux = self.mux.clone();
        let mut configured = patterns(&self.config.routes);
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_update(&mux, &mut configured, &config);
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The Axum router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn mux(&self) -> Arc<ServeMux> {
        self.mux.clone()
    }

    pub fn config(&self) -> &MuxConfig {
        &self.config
    }
}

/// Registers `routes` into `mux`, returning how many patterns were new.
///
/// Entries sharing a pattern are combined: a single method-less entry
/// answers every method, otherwise a [`MethodMux`] keyed by each entry's
/// method is registered. Either every pattern is registered or, on error,
/// none is.
pub fn register_routes(mux: &ServeMux, routes: &[RouteConfig]) -> Result<usize, MuxError> {
    let mut grouped: BTreeMap<&str, Vec<&RouteConfig>> = BTreeMap::new();
    for route in routes {
        grouped.entry(route.pattern.as_str()).or_default().push(route);
    }

    let key = mux.param_key();
    let mut handlers: Vec<(&str, SharedHandler)> = Vec::with_capacity(grouped.len());
    for (pattern, entries) in grouped {
        let handler: SharedHandler = match entries.as_slice() {
            [route] if route.method.is_none() => {
                Arc::new(TextResponder::new(route.body.clone(), key))
            }
            _ => {
                let mut pairs = Vec::with_capacity(entries.len());
                for route in entries {
                    match route.method.as_deref() {
                        Some(method) => {
                            pairs.push((method, TextResponder::new(route.body.clone(), key)))
                        }
                        None => tracing::warn!(pattern, "Ignoring method-less entry on a method-keyed route"),
                    }
                }
                Arc::new(MethodMux::from_pairs(pairs)?)
            }
        };
        handlers.push((pattern, handler));
    }

    let created = mux
        .handle_all(handlers)?
        .into_iter()
        .filter(|registration| *registration == Registration::Created)
        .count();
    Ok(created)
}

fn patterns(routes: &[RouteConfig]) -> HashSet<String> {
    routes.iter().map(|r| r.pattern.clone()).collect()
}

fn apply_update(mux: &ServeMux, configured: &mut HashSet<String>, config: &MuxConfig) {
    if let Err(errors) = validate_config(config) {
        tracing::error!(
            error = %ConfigError::Validation(errors),
            "Rejected route update, keeping current routes"
        );
        return;
    }

    match register_routes(mux, &config.routes) {
        Ok(created) => {
            tracing::info!(routes = config.routes.len(), created, "Route table reloaded")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to apply route update, keeping current routes");
            return;
        }
    }

    let next = patterns(&config.routes);
    for stale in configured.difference(&next) {
        tracing::warn!(pattern = %stale, "Route removed from config stays registered");
    }
    configured.extend(next);
}
