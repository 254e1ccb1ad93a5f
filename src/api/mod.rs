use crate::{
    api::handlers::health,
    gate::{self, GateConfig},
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Router,
};
use std::{path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, error, info, Span};
use ulid::Ulid;

pub mod handlers;

pub const HEALTH_PATH: &str = "/_sitegate/health";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Static file origin for `root`.
pub fn origin(root: &Path) -> Router {
    Router::new().fallback_service(ServeDir::new(root))
}

/// Full application: the gate in front of `origin`, the health probe beside
/// it, and request-id/trace layers around both.
pub fn router(origin: Router, config: Arc<GateConfig>) -> Router {
    // Routes added after `protect` are outside the gate.
    gate::protect(origin, config)
        .route(HEALTH_PATH, get(health::health).options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span)),
        )
}

/// Serve `root` behind the gate until a shutdown signal arrives.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn new(port: u16, root: &Path, config: GateConfig) -> Result<()> {
    let app = router(origin(root), Arc::new(config));

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shutdown");

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    // Headers are left out on purpose: they carry the session cookie.
    debug_span!("http-request", path, request_id)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::{body::to_bytes, http::StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn app() -> Router {
        let origin = Router::new().fallback(|| async { "origin" });
        let config = GateConfig::new(Some(SecretString::from("hunter2".to_string())), "Docs");
        router(origin, Arc::new(config))
    }

    #[tokio::test]
    async fn health_is_outside_the_gate() -> Result<()> {
        let response = app()
            .oneshot(Request::get(HEALTH_PATH).body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn request_id_is_generated_and_propagated() -> Result<()> {
        let response = app()
            .oneshot(Request::get("/style.css").body(Body::empty())?)
            .await?;
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_default();
        assert!(Ulid::from_string(&request_id).is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn incoming_request_id_is_kept() -> Result<()> {
        let response = app()
            .oneshot(
                Request::get("/style.css")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
        Ok(())
    }

    #[tokio::test]
    async fn guarded_document_is_challenged() -> Result<()> {
        let response = app()
            .oneshot(Request::get("/docs").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body_text = String::from_utf8(body.to_vec())?;
        assert!(body_text.contains(r#"action="/docs""#));
        assert!(!body_text.contains("origin"));
        Ok(())
    }
}
