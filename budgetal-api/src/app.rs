/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use budgetal_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let template = config.budget.load_template()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config, template));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use budgetal_shared::{
    auth::middleware::authenticate,
    budget::{AnnualBudgetItems, BudgetProvisioner, DefaultTemplate, StatisticsAggregator},
    store::{AnnualBudgetStore, PgStore, TransactionSource},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor; all fields
/// are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Budget storage, used directly for health checks
    pub budgets: Arc<dyn AnnualBudgetStore>,

    /// Get-or-create service for annual budgets
    pub provisioner: BudgetProvisioner,

    /// Owner-scoped item edits
    pub items: AnnualBudgetItems,

    /// Monthly spending statistics
    pub statistics: StatisticsAggregator,
}

impl AppState {
    /// Creates state backed by Postgres
    pub fn new(pool: PgPool, config: Config, template: DefaultTemplate) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::with_stores(config, store.clone(), store, template)
    }

    /// Creates state over arbitrary stores
    pub fn with_stores(
        config: Config,
        budgets: Arc<dyn AnnualBudgetStore>,
        transactions: Arc<dyn TransactionSource>,
        template: DefaultTemplate,
    ) -> Self {
        let provisioner = BudgetProvisioner::new(budgets.clone(), template, config.budget.window);
        let items = AnnualBudgetItems::new(budgets.clone());

        Self {
            config: Arc::new(config),
            budgets,
            provisioner,
            items,
            statistics: StatisticsAggregator::new(transactions),
        }
    }

    /// Gets JWT secret for token validation
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health                               # public
/// ├── GET /annual-budgets/:year                 # authenticated
/// ├── POST|PUT /annual-budget-items             # authenticated
/// ├── DELETE /annual-budget-items/:id           # authenticated
/// └── GET /monthly-statistics/:year/:month      # authenticated
/// ```
///
/// Tracing, CORS and security headers wrap every route; authentication
/// wraps only the budget routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let budget_routes = Router::new()
        .route(
            "/annual-budgets/:year",
            get(routes::annual_budgets::get_annual_budget),
        )
        .route(
            "/annual-budget-items",
            post(routes::annual_budget_items::create_annual_budget_item)
                .put(routes::annual_budget_items::update_annual_budget_item),
        )
        .route(
            "/annual-budget-items/:id",
            delete(routes::annual_budget_items::delete_annual_budget_item),
        )
        .route(
            "/monthly-statistics/:year/:month",
            get(routes::monthly_statistics::get_monthly_statistics),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
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
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-budgetal-session"),
            ])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .merge(budget_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Rejects unauthenticated requests and injects the caller's `AuthContext`
///
/// Accepts `Authorization: Bearer` or the session header.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;
    tracing::debug!(user_id = %auth_context.user_id, "Authenticated request");
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
