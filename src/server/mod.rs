//! HTTP server exposing the study set store as JSON.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/studySets` | 200 array of sets | |
//! | GET | `/api/studySets/{id}` | 200 set | 404 |
//! | POST | `/api/studySets` | 201 `{message, id}` | 400 |
//! | PUT | `/api/studySets/{id}` | 200 `{message}` | 400, 404 |
//! | DELETE | `/api/studySets/{id}` | 200 `{message}` | 404 |

mod error;
mod handlers;

pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::study_sets::StudySetStorage;

/// Server state shared across requests.
pub struct ServerState {
    pub storage: StudySetStorage,
}

/// Build the API router over a storage directory.
pub fn router(storage: StudySetStorage, permissive_cors: bool) -> Router {
    let state = Arc::new(ServerState { storage });

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/studySets",
            get(handlers::list_study_sets).post(handlers::create_study_set),
        )
        .route(
            "/api/studySets/{id}",
            get(handlers::get_study_set)
                .put(handlers::update_study_set)
                .delete(handlers::delete_study_set),
        )
        .with_state(state)
        .layer(middleware::from_fn(log_requests));

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Log one line per request with its status and latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Handle for a running server.
pub struct StudyServer {
    /// Address the server is listening on.
    pub addr: SocketAddr,
    /// Shutdown signal sender.
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl StudyServer {
    /// Get the base URL for this server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            log::warn!("Server task ended abnormally: {}", e);
        }
    }
}

/// Start the study set server.
///
/// Binding to port 0 picks a free port; the chosen address is on the
/// returned handle.
pub async fn start_server(
    config: &ServerConfig,
) -> Result<StudyServer, Box<dyn std::error::Error + Send + Sync>> {
    let storage = StudySetStorage::new(config.data_dir.clone());
    storage.init()?;

    let app = router(storage, config.permissive_cors);

    let listener = TcpListener::bind(config.socket_addr()).await?;
    let addr = listener.local_addr()?;

    log::info!(
        "Study set server started on http://{} (data in {:?})",
        addr,
        config.data_dir
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                log::info!("Study set server shutting down");
            })
            .await;
        if let Err(e) = result {
            log::error!("Study set server error: {}", e);
        }
    });

    Ok(StudyServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = StudySetStorage::new(temp_dir.path().join("study_sets"));
        (router(storage, false), temp_dir)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn algebra() -> Value {
        json!({
            "title": "Algebra",
            "description": "Basics",
            "cards": [
                {"front": "x+1=2", "back": "x=1"},
                {"front": "2x=4", "back": "x=2"},
                {"front": "x-3=0", "back": "x=3"},
                {"front": "x/2=2", "back": "x=4"}
            ]
        })
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (app, _temp) = test_router();

        let (status, created) = send(&app, Method::POST, "/api/studySets", Some(algebra())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("algebra_"));

        let (status, list) = send(&app, Method::GET, "/api/studySets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], id.as_str());
        assert_eq!(list[0]["cards"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_title_or_cards() {
        let (app, _temp) = test_router();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/studySets",
            Some(json!({"description": "no title", "cards": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/studySets",
            Some(json!({"title": "T", "cards": "not an array"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/studySets",
            Some(json!({"title": "T", "cards": [{"front": "", "back": ""}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_long_title() {
        let (app, _temp) = test_router();
        let title = "a".repeat(300);

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/studySets",
            Some(json!({
                "title": title,
                "description": "d",
                "cards": [{"front": "a", "back": "b"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/studySets/{}", created["id"].as_str().unwrap());
        let (status, set) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(set["title"].as_str().unwrap().len(), 300);
    }

    #[tokio::test]
    async fn test_create_with_null_description() {
        let (app, _temp) = test_router();

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/studySets",
            Some(json!({
                "title": "T",
                "description": null,
                "cards": [{"front": "a", "back": "b"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/studySets/{}", created["id"].as_str().unwrap());
        let (_, set) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(set["description"], "");
    }

    #[tokio::test]
    async fn test_update_checks_id_before_body() {
        let (app, _temp) = test_router();

        let not_a_set = Some(json!("not a set"));
        let (status, body) =
            send(&app, Method::PUT, "/api/studySets/nope_1", not_a_set.clone()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Study set not found");

        let (_, created) = send(&app, Method::POST, "/api/studySets", Some(algebra())).await;
        let uri = format!("/api/studySets/{}", created["id"].as_str().unwrap());
        let (status, _) = send(&app, Method::PUT, &uri, not_a_set).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let (app, _temp) = test_router();
        send(&app, Method::POST, "/api/studySets", Some(algebra())).await;

        let (_, first) = send(&app, Method::GET, "/api/studySets", None).await;
        let (_, second) = send(&app, Method::GET, "/api/studySets", None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let (app, _temp) = test_router();
        let (_, created) = send(&app, Method::POST, "/api/studySets", Some(algebra())).await;
        let uri = format!("/api/studySets/{}", created["id"].as_str().unwrap());

        let rename = Some(json!({"title": "Algebra II"}));
        let (status, body) = send(&app, Method::PUT, &uri, rename).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Study set updated");

        let (status, set) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(set["title"], "Algebra II");
        assert_eq!(set["description"], "Basics");
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let (app, _temp) = test_router();

        let rename = Some(json!({"title": "x"}));
        let (status, _) = send(&app, Method::PUT, "/api/studySets/nope_1", rename).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, "/api/studySets/nope_1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Study set not found");

        let (status, _) = send(&app, Method::GET, "/api/studySets/nope_1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete() {
        let (app, _temp) = test_router();
        let (_, created) = send(&app, Method::POST, "/api/studySets", Some(algebra())).await;
        let uri = format!("/api/studySets/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Study set deleted");

        let (_, list) = send(&app, Method::GET, "/api/studySets", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _temp) = test_router();
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
