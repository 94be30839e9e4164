pub mod gps;
pub mod health;
pub mod openapi;
pub mod schemas;
pub mod sentiments;
pub mod videos;
pub mod vlogs;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use emogo_gateway::Gateway;

use self::openapi::ApiDoc;

/// Room left in an upload request for the multipart framing and the
/// descriptive form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gateway instance.
    pub gateway: Arc<Gateway>,
    /// Path to the dashboard static files.
    pub dashboard_path: Option<String>,
    /// Whether the dashboard is enabled.
    pub dashboard_enabled: bool,
}

impl AppState {
    /// State with the dashboard disabled.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            dashboard_path: None,
            dashboard_enabled: false,
        }
    }
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.gateway.max_upload_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route(
            "/sentiments",
            get(sentiments::list_sentiments).post(sentiments::create_sentiment),
        )
        .route("/gps", get(gps::list_gps).post(gps::create_gps))
        .route("/vlogs", get(vlogs::list_vlogs).post(vlogs::create_vlog))
        .route(
            "/vlogs/upload",
            post(vlogs::upload_vlog).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/vlogs/{id}", get(vlogs::get_vlog))
        .route("/videos/{key}", get(videos::get_video))
        // Swagger UI must be merged BEFORE the dashboard fallback, otherwise
        // the fallback swallows /swagger-ui requests.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(path_str) = state.dashboard_path.as_ref().filter(|_| state.dashboard_enabled) {
        let path = std::path::PathBuf::from(path_str);
        if path.exists() {
            let index_path = path.join("index.html");
            router = router.fallback_service(
                ServeDir::new(path).fallback(tower_http::services::ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!(
                path = %path.display(),
                "dashboard directory not found, dashboard will not be served"
            );
        }
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
