//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all gateway handler
//! - Wire up middleware (tracing, request ID, CORS)
//! - Bind server to listener
//! - Dispatch requests through the route table to their pipeline
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::middleware::cors_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::pipeline::{upstream_client, Pipelines, TargetError};
use crate::routing::{console_routes, Router as GatewayRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<GatewayRouter>,
}

/// HTTP server for the console gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if an upstream address cannot be turned into a forwarding target.
    pub fn new(config: GatewayConfig) -> Result<Self, TargetError> {
        let client = upstream_client(&config.timeouts);
        let pipelines = Pipelines::from_config(&config, client)?;
        let routes = console_routes(&config.web_server);
        let gateway_router = Arc::new(GatewayRouter::from_table(&routes, &pipelines));

        tracing::info!(
            routes = gateway_router.len(),
            polaris_server = %config.polaris_server.address,
            monitor_server = %config.monitor_server.address,
            "Route table compiled"
        );

        let state = AppState {
            router: gateway_router,
        };
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware::from_fn(cors_middleware))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown::wait(shutdown_rx).await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Looks up the route and hands the request to its pipeline.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let (route_name, pipeline) = match state.router.match_request(&request) {
        Some(route) => (route.name.clone(), route.pipeline.clone()),
        None => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            metrics::record_request("none", method.as_str(), 404, "no_route", start_time);
            return (StatusCode::NOT_FOUND, "No matching route found").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route_name,
        pipeline = pipeline.name(),
        "Forwarding request"
    );

    match pipeline.handle(request).await {
        Ok(forwarded) => {
            let status = forwarded.response.status();
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                pipeline = pipeline.name(),
                outcome = forwarded.outcome.as_str(),
                status = status.as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request forwarded"
            );
            metrics::record_request(
                pipeline.name(),
                method.as_str(),
                status.as_u16(),
                forwarded.outcome.as_str(),
                start_time,
            );
            forwarded.response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e,
                "Response interception failed"
            );
            metrics::record_request(pipeline.name(), method.as_str(), 500, "error", start_time);
            e.into_response()
        }
    }
}
