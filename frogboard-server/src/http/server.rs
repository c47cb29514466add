//! Axum server setup
//!
//! Server skeleton with:
//! - Tracing middleware
//! - Ban enforcement on every route
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::Path;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::middleware::reject_banned;
use super::routes;
use crate::config::{ConfigError, ServerConfig};
use crate::state::AppState;

/// Build the application router.
///
/// `public_dir`, when set, is served under `/public`.
pub fn build_router(state: AppState, public_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::boards::router())
        .merge(routes::threads::router())
        .merge(routes::api::router());

    if let Some(dir) = public_dir {
        tracing::info!(path = %dir.display(), "Serving static files from /public/");
        app = app.nest_service("/public", ServeDir::new(dir));
    }

    app.layer(middleware::from_fn_with_state(state.clone(), reject_banned))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config)?;
    tracing::info!(
        boards = state.boards().len(),
        bans = state.bans().len(),
        "Board state initialised"
    );

    let app = build_router(state, config.public_dir.as_deref());

    // Bind listener
    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!("Server listening on {}", config.bind);

    // Peer addresses feed the ban check
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    const CONFIG: &str = r#"
[[boards]]
id = "b"
full_name = "Random"

[[boards]]
id = "g"
full_name = "Technology"

[[bans]]
ip = "203.0.113.9"
reason = "spam"
start = "2020-01-01T00:00:00Z"
end = "2999-01-01T00:00:00Z"

[[bans]]
ip = "203.0.113.10"
reason = "expired"
start = "2020-01-01T00:00:00Z"
end = "2021-01-01T00:00:00Z"
"#;

    fn app() -> Router {
        let config = ServerConfig::from_toml_str(CONFIG).unwrap();
        build_router(AppState::from_config(&config).unwrap(), None)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn from_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn index_lists_boards() {
        let response = app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("/b/ - Random"));
        assert!(html.contains("/g/ - Technology"));
    }

    #[tokio::test]
    async fn unknown_board_is_404() {
        let response = app().oneshot(get("/zz/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_board_is_400() {
        let response = app().oneshot(get("/NOPE/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn thread_and_reply_flow() {
        let app = app();

        // Create thread
        let response = app
            .clone()
            .oneshot(form("/b/", "title=frogs&author=alice&content=ribbit"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/b/1/");

        // Reply citing the opening post
        let response = app
            .clone()
            .oneshot(form("/b/1/", "content=%3E%3E1+croak"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/b/1/#p2");

        // Thread page shows both posts
        let response = app.clone().oneshot(get("/b/1/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("ribbit"));
        assert!(html.contains("croak"));
        assert!(html.contains("Anonymous"));
        assert!(html.contains(r#"data-role="backlinks""#));

        // A reply's permalink redirects into its thread
        let response = app.clone().oneshot(get("/b/2/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/b/1/#p2");

        // Board page previews the thread
        let response = app.clone().oneshot(get("/b/")).await.unwrap();
        let html = body_text(response).await;
        assert!(html.contains("frogs"));

        // Boards keep separate id sequences
        let response = app
            .clone()
            .oneshot(form("/g/", "content=first"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/g/1/");
    }

    #[tokio::test]
    async fn feed_lists_posts_in_order() {
        let app = app();
        for content in ["content=older", "content=newer"] {
            app.clone().oneshot(form("/b/", content)).await.unwrap();
        }

        let html = body_text(app.clone().oneshot(get("/b/feed/?order=asc")).await.unwrap()).await;
        assert!(html.find("older").unwrap() < html.find("newer").unwrap());

        let html = body_text(app.clone().oneshot(get("/b/feed/")).await.unwrap()).await;
        assert!(html.find("newer").unwrap() < html.find("older").unwrap());
    }

    #[tokio::test]
    async fn empty_content_is_400() {
        let response = app()
            .oneshot(form("/b/", "title=hi&content=+++"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_query_is_json_400() {
        for uri in ["/b/?page=abc", "/b/feed/?order=sideways"] {
            let response = app().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

            let json: serde_json::Value =
                serde_json::from_str(&body_text(response).await).unwrap();
            assert_eq!(json["error"], "bad_request", "{uri}");
            assert!(json["message"].is_string());
        }
    }

    #[tokio::test]
    async fn reply_to_missing_thread_is_404() {
        let response = app().oneshot(form("/b/9/", "content=hello")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_post_is_404() {
        let response = app().oneshot(get("/b/42/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app().oneshot(get("/b/0/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn api_returns_post_json() {
        let app = app();
        app.clone()
            .oneshot(form("/b/", "content=%3Cb%3Ehi%3C%2Fb%3E"))
            .await
            .unwrap();

        let response = app.clone().oneshot(get("/api/post/b/1/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["thread"], 1);
        assert_eq!(json["content"], "<b>hi</b>");
        assert_eq!(json["html"], "&lt;b&gt;hi&lt;/b&gt;");

        let response = app.oneshot(get("/api/post/b/5/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn banned_address_gets_403() {
        let response = app()
            .oneshot(from_peer(get("/"), "203.0.113.9:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let html = body_text(response).await;
        assert!(html.contains("You are banned"));
        assert!(html.contains("spam"));
    }

    #[tokio::test]
    async fn banned_address_cannot_post() {
        let app = app();
        let response = app
            .clone()
            .oneshot(from_peer(form("/b/", "content=spam"), "203.0.113.9:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.oneshot(get("/b/1/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn expired_ban_does_not_apply() {
        let response = app()
            .oneshot(from_peer(get("/"), "203.0.113.10:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(from_peer(get("/"), "198.51.100.1:5000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn serves_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body{}").unwrap();

        let config = ServerConfig::from_toml_str(CONFIG).unwrap();
        let app = build_router(AppState::from_config(&config).unwrap(), Some(dir.path()));

        let response = app.oneshot(get("/public/style.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "body{}");
    }
}
