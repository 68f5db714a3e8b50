//! Upstream response interception.
//!
//! # Responsibilities
//! - Evaluate a pipeline's rules against the upstream status, in order
//! - On the first match, close the upstream body and build the replacement
//! - Otherwise hand back the upstream response untouched, body still streaming
//!
//! # Design Decisions
//! - First match wins; at most one rule fires per response
//! - The replacement is a freshly built response, never a patched one
//! - The upstream body is never awaited once a rule fires; only data the
//!   transport already buffered is inspected, then the body is dropped and
//!   its connection is not reused
//! - An error among the buffered data aborts the interception

use axum::{body::Body, http::Response};
use futures_util::{FutureExt, StreamExt};
use thiserror::Error;

use crate::pipeline::rule::InterceptionRule;

/// Upper bound on buffered upstream body bytes inspected before a replacement.
const DISCARD_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("failed to discard upstream body: {0}")]
    DiscardBody(#[source] axum::Error),
}

/// Result of running the rules over one upstream response.
#[derive(Debug)]
pub struct Interception<'a> {
    pub response: Response<Body>,
    /// The rule that rewrote the response, if any.
    pub fired: Option<&'a InterceptionRule>,
}

/// Apply the first rule whose trigger matches the response status.
pub fn intercept<'a>(
    response: Response<Body>,
    rules: &'a [InterceptionRule],
) -> Result<Interception<'a>, InterceptError> {
    let status = response.status();
    let Some(rule) = rules.iter().find(|rule| rule.trigger().fires(status)) else {
        return Ok(Interception {
            response,
            fired: None,
        });
    };

    let (parts, body) = response.into_parts();
    discard(body)?;

    Ok(Interception {
        response: rule.replacement().merge_into(parts.headers),
        fired: Some(rule),
    })
}

/// Close an unwanted upstream body without waiting on the upstream.
fn discard(body: Body) -> Result<(), InterceptError> {
    let mut stream = body.into_data_stream();
    let mut drained = 0usize;
    while drained <= DISCARD_LIMIT {
        match stream.next().now_or_never() {
            Some(Some(chunk)) => drained += chunk.map_err(InterceptError::DiscardBody)?.len(),
            Some(None) | None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::rule::{Replacement, StatusTrigger};
    use axum::body::{to_bytes, Bytes};
    use axum::http::{header, StatusCode};

    const SUCCESS: &str = r#"{"code": 200000,"info": "success"}"#;

    fn upstream(status: StatusCode, body: &'static str) -> Response<Body> {
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .header("x-upstream", "polaris")
            .body(Body::from(body))
            .unwrap()
    }

    fn not_found_rule() -> InterceptionRule {
        InterceptionRule::new(
            "not-found-as-success",
            StatusTrigger::Is(StatusCode::NOT_FOUND),
            Replacement::json(StatusCode::OK, SUCCESS),
        )
    }

    #[tokio::test]
    async fn test_no_match_passes_through() {
        let rules = [not_found_rule()];
        let result = intercept(upstream(StatusCode::OK, r#"{"user":"alice"}"#), &rules)
            .unwrap();

        assert!(result.fired.is_none());
        let response = result.response;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-upstream"], "polaris");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "16");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, Bytes::from_static(br#"{"user":"alice"}"#));
    }

    #[tokio::test]
    async fn test_not_found_rewritten() {
        let rules = [not_found_rule()];
        let result = intercept(upstream(StatusCode::NOT_FOUND, r#"{"msg":"not found"}"#), &rules)
            .unwrap();

        assert_eq!(result.fired.map(|r| r.name()), Some("not-found-as-success"));
        let response = result.response;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_LENGTH],
            SUCCESS.len().to_string().as_str()
        );
        assert_eq!(response.headers()["x-upstream"], "polaris");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, SUCCESS.as_bytes());
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let rules = [
            InterceptionRule::new(
                "not-ok",
                StatusTrigger::IsNot(StatusCode::OK),
                Replacement::new(StatusCode::OK, "first"),
            ),
            InterceptionRule::new(
                "not-found",
                StatusTrigger::Is(StatusCode::NOT_FOUND),
                Replacement::new(StatusCode::ACCEPTED, "second"),
            ),
        ];

        let result = intercept(upstream(StatusCode::NOT_FOUND, "gone"), &rules).unwrap();

        assert_eq!(result.fired.map(|r| r.name()), Some("not-ok"));
        assert_eq!(result.response.status(), StatusCode::OK);
        let body = to_bytes(result.response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "first");
    }

    #[test]
    fn test_body_error_aborts() {
        let failing = futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from_stream(failing))
            .unwrap();

        let rules = [not_found_rule()];
        let err = intercept(response, &rules).unwrap_err();
        assert!(matches!(err, InterceptError::DiscardBody(_)));
    }

    #[test]
    fn test_body_error_ignored_without_match() {
        let failing = futures_util::stream::iter(vec![Err::<Bytes, _>(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ))]);
        let response = Response::builder()
            .status(StatusCode::OK)
            .body(Body::from_stream(failing))
            .unwrap();

        let rules = [not_found_rule()];
        let result = intercept(response, &rules).unwrap();
        assert!(result.fired.is_none());
    }

    #[test]
    fn test_stalled_body_not_awaited() {
        let stalled = futures_util::stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(
            br#"{"msg":"#,
        ))])
        .chain(futures_util::stream::pending());
        let response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_LENGTH, "100")
            .body(Body::from_stream(stalled))
            .unwrap();

        let rules = [not_found_rule()];
        let result = intercept(response, &rules).unwrap();
        assert_eq!(result.fired.map(|r| r.name()), Some("not-found-as-success"));
        assert_eq!(
            result.response.headers()[header::CONTENT_LENGTH],
            SUCCESS.len().to_string().as_str()
        );
    }
}
