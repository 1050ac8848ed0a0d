mod assets;
mod config;
mod graphql;

use std::path::Path;
use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use config::Config;
use graphql::Schema;

#[derive(Clone)]
struct AppState {
    schema: Schema,
    index_path: Arc<Path>,
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><title>Frame Compare</title></head>
<body>
<h1>Frame Compare</h1>
<p>Frontend not built yet. Visit <a href="/graphql">GraphiQL</a> to explore the catalog.</p>
</body>
</html>"#;

/// Build the full application router.
fn build_app(schema: Schema, config: &Config) -> Router {
    // Static file routers are stateless; merge them before adding app state.
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_assets_dir(), CACHE_IMMUTABLE),
        );

    let state = AppState {
        schema,
        index_path: Arc::from(config.index_path()),
    };

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/", get(serve_index))
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

async fn serve_index(State(state): State<AppState>) -> Html<String> {
    // Serve the built frontend if present, otherwise a pointer to GraphiQL.
    match tokio::fs::read_to_string(&*state.index_path).await {
        Ok(html) => Html(html),
        Err(_) => Html(FALLBACK_INDEX.to_string()),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn run(config: Config) -> Result<(), String> {
    let assets = Arc::new(assets::Assets::load(&config.catalog_path())?);
    let schema = graphql::build_schema(assets);
    let app = build_app(schema, &config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    tracing::info!(port = config.port, "Server running at http://localhost:{}", config.port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", config.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

#[tokio::main]
async fn main() {
    init_tracing();
    let result = match Config::from_env() {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;

    const CATALOG_JSON: &str = include_str!("../../../assets/catalog.json");

    struct Dirs {
        assets: tempfile::TempDir,
        dist: tempfile::TempDir,
    }

    impl Dirs {
        fn new() -> Self {
            let assets = tempfile::tempdir().unwrap();
            std::fs::write(assets.path().join("catalog.json"), CATALOG_JSON).unwrap();
            let dist = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(dist.path().join("assets")).unwrap();
            std::fs::write(dist.path().join("frontend-abc123.js"), "bundle()").unwrap();
            std::fs::write(dist.path().join("assets/main-xyz.css"), "body{}").unwrap();
            Dirs { assets, dist }
        }

        fn config(&self) -> Config {
            Config {
                port: 0,
                assets_dir: self.assets.path().to_path_buf(),
                dist_dir: self.dist.path().to_path_buf(),
            }
        }

        fn app(&self) -> Router {
            let config = self.config();
            let assets = Arc::new(assets::Assets::load(&config.catalog_path()).unwrap());
            build_app(graphql::build_schema(assets), &config)
        }
    }

    /// The repository's own `assets/` directory.
    fn shipped_assets_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets")
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_shipped_reference_presets_are_served() {
        let dirs = Dirs::new();
        let config = Config {
            assets_dir: shipped_assets_dir(),
            ..dirs.config()
        };
        let assets = Arc::new(assets::Assets::load(&config.catalog_path()).unwrap());
        let urls: Vec<String> = assets.catalog.presets().iter().map(|p| p.url.clone()).collect();
        assert_eq!(urls.len(), 3);

        let app = build_app(graphql::build_schema(assets), &config);
        for url in &urls {
            let resp = app.clone().oneshot(get_req(url)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{url}");
            assert_eq!(resp.headers().get("content-type").unwrap(), "image/svg+xml");
            assert_eq!(resp.headers().get("cache-control").unwrap(), CACHE_1DAY);
        }
    }

    #[tokio::test]
    async fn test_hashed_bundles_are_immutable() {
        let dirs = Dirs::new();
        let app = dirs.app();
        for uri in ["/dist/frontend-abc123.js", "/assets/main-xyz.css"] {
            let resp = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            assert_eq!(resp.headers().get("cache-control").unwrap(), CACHE_IMMUTABLE);
        }
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let dirs = Dirs::new();
        let resp = dirs
            .app()
            .oneshot(get_req("/static/reference/missing.jpg"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_falls_back_when_frontend_not_built() {
        let dirs = Dirs::new();
        let resp = dirs.app().oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("Frontend not built yet"));
    }

    #[tokio::test]
    async fn test_index_serves_built_frontend() {
        let dirs = Dirs::new();
        std::fs::write(dirs.dist.path().join("index.html"), "<html>built</html>").unwrap();
        let resp = dirs.app().oneshot(get_req("/")).await.unwrap();
        assert_eq!(body_string(resp).await, "<html>built</html>");
    }

    #[tokio::test]
    async fn test_graphql_post_executes_query() {
        let dirs = Dirs::new();
        let req = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"query":"{ coverage(formatId: \"ff-35mm\", circleId: \"pl-s35\") { covered } }"}"#,
            ))
            .unwrap();
        let resp = dirs.app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json["data"]["coverage"]["covered"], false);
    }

    #[tokio::test]
    async fn test_graphiql_page() {
        let dirs = Dirs::new();
        let resp = dirs.app().oneshot(get_req("/graphql")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("graphiql"));
    }
}
