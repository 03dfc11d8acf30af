/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use norma_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let channels = norma_worker::build_channels(&config.notifications)?;
/// let state = AppState::new(pool, config, channels);
/// let app = norma_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post, put},
    Router,
};
use norma_shared::auth::{jwt, middleware::AuthContext};
use norma_worker::channels::NotificationChannel;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Notification channels used by the cron-triggered scan
    pub channels: Vec<Arc<dyn NotificationChannel>>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        db: PgPool,
        config: Config,
        channels: Vec<Arc<dyn NotificationChannel>>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            channels,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                         # Health check (public)
/// └── /v1/
///     ├── /auth/                      # register, login, refresh (public)
///     ├── /billing/webhook            # provider events (signature auth)
///     ├── /cron/check-expiries        # scheduled trigger (static bearer)
///     ├── /organizations/             # current tenant, members, billing (JWT)
///     ├── /modules/                   # catalog, state, access, trials (JWT)
///     ├── /employees/                 # employees + exams + trainings (JWT)
///     ├── /equipment/                 # equipment + inspections (JWT)
///     └── /alerts                     # scan output (JWT)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. JWT authentication (per-route-group basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Billing webhook (public; authenticated by the event signature)
    let billing_routes = Router::new().route("/webhook", post(routes::billing::webhook));

    // Cron triggers (authenticated by static bearer secret in the handler)
    let cron_routes = Router::new().route("/check-expiries", post(routes::cron::check_expiries));

    // Organization routes (require JWT authentication)
    let organization_routes = Router::new()
        .route("/current", get(routes::organizations::get_current))
        .route("/current", patch(routes::organizations::update_current))
        .route("/members", get(routes::organizations::list_members))
        .route(
            "/subscriptions",
            get(routes::organizations::list_subscriptions),
        );

    // Module catalog and entitlement routes (require JWT authentication)
    let module_routes = Router::new()
        .route("/", get(routes::modules::list_catalog))
        .route("/state", get(routes::modules::list_state))
        .route("/:key/access", get(routes::modules::get_access))
        .route("/:key/trial", post(routes::modules::start_trial));

    // Employee routes (require JWT authentication)
    let employee_routes = Router::new()
        .route("/", post(routes::employees::create_employee))
        .route("/", get(routes::employees::list_employees))
        .route("/:id", get(routes::employees::get_employee))
        .route("/:id", put(routes::employees::update_employee))
        .route("/:id", axum::routing::delete(routes::employees::delete_employee))
        .route(
            "/:id/medical-exams",
            post(routes::records::create_medical_exam).get(routes::records::list_medical_exams),
        )
        .route(
            "/:id/trainings",
            post(routes::records::create_training).get(routes::records::list_trainings),
        );

    // Equipment routes (require JWT authentication)
    let equipment_routes = Router::new()
        .route(
            "/",
            post(routes::records::create_equipment).get(routes::records::list_equipment),
        )
        .route("/:id/inspection", put(routes::records::record_inspection));

    // Alert routes (require JWT authentication)
    let alert_routes = Router::new().route("/", get(routes::alerts::list_alerts));

    let protected_routes = Router::new()
        .nest("/organizations", organization_routes)
        .nest("/modules", module_routes)
        .nest("/employees", employee_routes)
        .nest("/equipment", equipment_routes)
        .nest("/alerts", alert_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/billing", billing_routes)
        .nest("/cron", cron_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT from the Authorization header, then
/// injects AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub, claims.organization_id);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
