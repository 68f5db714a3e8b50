//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for request
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in table order (acceptable for the console's route count)
//! - Explicit NoMatch rather than silent default

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::pipeline::{Pipeline, Pipelines};
use crate::routing::matcher::{AndMatcher, Matcher, MethodMatcher, PathPatternMatcher};
use crate::routing::table::RouteEntry;

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    /// `METHOD /pattern`, for logging.
    pub name: String,
    pub pipeline: Arc<Pipeline>,
    matcher: AndMatcher,
}

impl Route {
    pub fn new(entry: &RouteEntry, pipeline: Arc<Pipeline>) -> Self {
        Self {
            name: format!("{} {}", entry.method, entry.pattern),
            pipeline,
            matcher: AndMatcher::new(vec![
                Box::new(MethodMatcher::new(entry.method.clone())),
                Box::new(PathPatternMatcher::new(&entry.pattern)),
            ]),
        }
    }
}

/// Immutable route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Compile a route table against the built pipelines.
    pub fn from_table(entries: &[RouteEntry], pipelines: &Pipelines) -> Self {
        let routes = entries
            .iter()
            .map(|entry| Route::new(entry, pipelines.get(entry.pipeline)))
            .collect();
        Self::new(routes)
    }

    /// First route whose matcher accepts the request.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Route> {
        self.routes.iter().find(|route| route.matcher.matches(req))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::pipeline::{upstream_client, PipelineKind};
    use crate::routing::table::console_routes;
    use axum::http::Method;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn console_router() -> Router {
        let config = GatewayConfig::default();
        let pipelines =
            Pipelines::from_config(&config, upstream_client(&config.timeouts)).unwrap();
        Router::from_table(&console_routes(&config.web_server), &pipelines)
    }

    #[tokio::test]
    async fn test_dispatches_to_pipeline() {
        let router = console_router();

        let route = router
            .match_request(&request(Method::GET, "/maintain/v1/mainuser/exist"))
            .unwrap();
        assert_eq!(route.pipeline.name(), PipelineKind::MainUser.as_str());

        let route = router
            .match_request(&request(Method::POST, "/maintain/v1/mainuser/create"))
            .unwrap();
        assert_eq!(route.pipeline.name(), PipelineKind::Bootstrap.as_str());

        let route = router
            .match_request(&request(Method::GET, "/api/v1/label/instance/values"))
            .unwrap();
        assert_eq!(route.pipeline.name(), PipelineKind::Monitor.as_str());
    }

    #[tokio::test]
    async fn test_first_match_in_table_order() {
        let router = console_router();

        let route = router
            .match_request(&request(Method::POST, "/naming/v1/services/delete"))
            .unwrap();
        assert_eq!(route.name, "POST /naming/v1/services/delete");

        let route = router
            .match_request(&request(Method::GET, "/naming/v1/services?namespace=default"))
            .unwrap();
        assert_eq!(route.name, "GET /naming/v1/:resource");
    }

    #[tokio::test]
    async fn test_no_match() {
        let router = console_router();
        assert!(!router.is_empty());
        assert!(router
            .match_request(&request(Method::DELETE, "/naming/v1/services"))
            .is_none());
        assert!(router
            .match_request(&request(Method::GET, "/unknown/path"))
            .is_none());
    }
}
