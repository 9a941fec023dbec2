//! HTTP request layer: routes `/graph/*` calls to the graph service and
//! serializes results as JSON.

use crate::config::HttpServerConfig;
use crate::error::{MovieGraphError, Result};
use crate::graph::{Edge, GraphSummary, NodeInfo, TraversalComparison, VisualizationData};
use crate::service::{AddActorRequest, GraphService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upstream failure surfaced as a 500 with a JSON body.
struct ApiError(MovieGraphError);

impl From<MovieGraphError> for ApiError {
    fn from(err: MovieGraphError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("Error processing graph request: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Internal server error",
                "details": self.0.to_string()
            })),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    service: Arc<GraphService>,
}

/// HTTP server wrapper
pub struct HttpServer {
    service: Arc<GraphService>,
    config: HttpServerConfig,
}

impl HttpServer {
    pub fn new(service: GraphService, config: HttpServerConfig) -> Self {
        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// Run the HTTP server until it fails
    pub async fn run(&self) -> Result<()> {
        let app = self.router();
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            MovieGraphError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to bind to {}: {}. Set http_server.port in config.toml to use a different port.",
                    addr, e
                ),
            ))
        })?;

        log::info!("Starting MovieGraph HTTP server on http://{}", addr);
        log::info!("Graph endpoints under http://{}/graph", addr);

        axum::serve(listener, app).await.map_err(|e| {
            MovieGraphError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        // No configured origins: allow any (local development).
        let cors = if self.config.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .config
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let graph_routes = Router::new()
            .route("/info", get(handle_info))
            .route("/nodes", get(handle_nodes))
            .route("/nodes/type/:node_type", get(handle_nodes_by_type))
            .route("/nodes/:node_id/neighbors", get(handle_neighbors))
            .route("/nodes/:node_id/info", get(handle_node_info))
            .route("/edges", get(handle_edges))
            .route("/dfs/:start", get(handle_dfs))
            .route("/dfs-iterative/:start", get(handle_dfs_iterative))
            .route("/bfs/:start", get(handle_bfs))
            .route("/shortest-path/:start/:end", get(handle_shortest_path))
            .route("/string", get(handle_graph_string))
            .route("/compare-traversals/:start", get(handle_compare_traversals))
            .route("/cytoscape-data", get(handle_cytoscape_data))
            .route("/add-actor", post(handle_add_actor))
            .route("/movies", get(handle_movies))
            .route("/actors", get(handle_actors));

        Router::new()
            .nest("/graph", graph_routes)
            .route("/health", get(handle_health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(AppState {
                service: Arc::clone(&self.service),
            })
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn handle_info(State(state): State<AppState>) -> ApiResult<Json<GraphSummary>> {
    Ok(Json(state.service.info().await?))
}

async fn handle_nodes(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.nodes().await?))
}

async fn handle_nodes_by_type(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.nodes_by_type(&node_type).await?))
}

async fn handle_neighbors(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.neighbors(&node_id).await?))
}

async fn handle_node_info(
    State(state): State<AppState>,
    Path(node_id): Path<String>,
) -> ApiResult<Json<NodeInfo>> {
    Ok(Json(state.service.node_info(&node_id).await?))
}

async fn handle_edges(State(state): State<AppState>) -> ApiResult<Json<Vec<Edge>>> {
    Ok(Json(state.service.edges().await?))
}

async fn handle_dfs(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.dfs(&start).await?))
}

async fn handle_dfs_iterative(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.dfs_iterative(&start).await?))
}

async fn handle_bfs(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.bfs(&start).await?))
}

async fn handle_shortest_path(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.shortest_path(&start, &end).await?))
}

async fn handle_graph_string(State(state): State<AppState>) -> ApiResult<String> {
    Ok(state.service.graph_string().await?)
}

async fn handle_compare_traversals(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> ApiResult<Json<TraversalComparison>> {
    Ok(Json(state.service.compare_traversals(&start).await?))
}

async fn handle_cytoscape_data(State(state): State<AppState>) -> ApiResult<Json<VisualizationData>> {
    Ok(Json(state.service.visualization().await?))
}

async fn handle_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.movies().await?))
}

async fn handle_actors(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.actors().await?))
}

/// Validation failures are answered 200 with `success: false`; only a body
/// that is not an actor request at all is a 400.
async fn handle_add_actor(State(state): State<AppState>, body: axum::body::Bytes) -> Response {
    let request: AddActorRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("Invalid JSON: {}", e)})),
            )
                .into_response();
        }
    };

    match state.service.add_actor(&request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrate, Db, MovieRepository};
    use crate::model::MovieRecord;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn setup_router() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));
        db.with_connection(migrate::run_migrations).await.unwrap();
        let repo = MovieRepository::new(db);
        repo.import(vec![
            MovieRecord::new("Inception")
                .with_actors(["Leonardo DiCaprio"])
                .with_directors(["Christopher Nolan"]),
            MovieRecord::new("The Revenant").with_actors(["Leonardo DiCaprio", "Tom Hardy"]),
        ])
        .await
        .unwrap();
        let server = HttpServer::new(GraphService::new(repo), HttpServerConfig::default());
        (server.router(), temp_dir)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _temp) = setup_router().await;
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_info_endpoint() {
        let (app, _temp) = setup_router().await;
        let (status, body) = get_json(&app, "/graph/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodeCount"], 5);
        assert_eq!(body["edgeCount"], 8);
        assert_eq!(body["isEmpty"], false);
    }

    #[tokio::test]
    async fn test_neighbors_with_encoded_id() {
        let (app, _temp) = setup_router().await;
        let (status, body) = get_json(&app, "/graph/nodes/Leonardo%20DiCaprio/neighbors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["Inception", "The Revenant"]));

        let (_, body) = get_json(&app, "/graph/nodes/Nobody/neighbors").await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_node_info_endpoint() {
        let (app, _temp) = setup_router().await;
        let (_, body) = get_json(&app, "/graph/nodes/Inception/info").await;
        assert_eq!(body["type"], "MOVIE");
        assert_eq!(body["neighborCount"], 2);

        let (_, body) = get_json(&app, "/graph/nodes/Nobody/info").await;
        assert_eq!(body["type"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_nodes_by_type_endpoint() {
        let (app, _temp) = setup_router().await;
        let (_, body) = get_json(&app, "/graph/nodes/type/person").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        let (_, body) = get_json(&app, "/graph/movies").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_edges_endpoint_returns_triples() {
        let (app, _temp) = setup_router().await;
        let (_, body) = get_json(&app, "/graph/edges").await;
        assert_eq!(body[0], serde_json::json!(["Leonardo DiCaprio", "Inception", "ACTED_IN"]));
    }

    #[tokio::test]
    async fn test_shortest_path_endpoint() {
        let (app, _temp) = setup_router().await;
        let (_, body) = get_json(&app, "/graph/shortest-path/Tom%20Hardy/Christopher%20Nolan").await;
        assert_eq!(
            body,
            serde_json::json!([
                "Tom Hardy",
                "The Revenant",
                "Leonardo DiCaprio",
                "Inception",
                "Christopher Nolan"
            ])
        );
    }

    #[tokio::test]
    async fn test_compare_traversals_endpoint() {
        let (app, _temp) = setup_router().await;
        let (_, body) = get_json(&app, "/graph/compare-traversals/Inception").await;
        assert_eq!(body["startNode"], "Inception");
        assert_eq!(body["dfsCount"], 5);
        assert_eq!(body["bfsCount"], 5);
    }

    #[tokio::test]
    async fn test_cytoscape_endpoint() {
        let (app, _temp) = setup_router().await;
        let (_, body) = get_json(&app, "/graph/cytoscape-data").await;
        assert_eq!(body["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(body["edges"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_graph_string_is_plain_text() {
        let (app, _temp) = setup_router().await;
        let response = app
            .oneshot(Request::builder().uri("/graph/string").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(bytes.to_vec()).unwrap().contains("Nodes: 5"));
    }

    #[tokio::test]
    async fn test_add_actor_endpoint() {
        let (app, _temp) = setup_router().await;
        let (status, body) = post_json(
            &app,
            "/graph/add-actor",
            r#"{"actorName": "Tom Hanks", "movieTitles": ["Inception", "Unknown Movie"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["addedRelations"], 1);

        let (_, body) = get_json(&app, "/graph/nodes/Tom%20Hanks/neighbors").await;
        assert_eq!(body, serde_json::json!(["Inception"]));
    }

    #[tokio::test]
    async fn test_add_actor_validation_failure() {
        let (app, _temp) = setup_router().await;
        let (status, body) = post_json(&app, "/graph/add-actor", r#"{"actorName": "", "movieTitles": ["Inception"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_add_actor_invalid_json() {
        let (app, _temp) = setup_router().await;
        let (status, body) = post_json(&app, "/graph/add-actor", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let temp_dir = TempDir::new().unwrap();
        let repo = MovieRepository::new(Db::new(temp_dir.path().join("no_schema.db")));
        let app = HttpServer::new(GraphService::new(repo), HttpServerConfig::default()).router();

        let (status, body) = get_json(&app, "/graph/info").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("Database error"));
    }
}
