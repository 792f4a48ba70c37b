use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mailassist::config::Config;
use mailassist::db;
use mailassist::services::{
    AccountService, AdminIdentityStore, AssistantService, AuthService, InferenceClient, LLMClient,
};
use mailassist::utils::JwtUtil;
use mailassist::{AppState, handlers, middleware, models, services};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        // Generation
        handlers::generate::generate,
        // Replies
        handlers::replies::list_replies,
        handlers::replies::delete_reply,
        // Account
        handlers::account::delete_account,
    ),
    components(
        schemas(
            models::User,
            models::UserResponse,
            models::RegisterRequest,
            models::LoginRequest,
            models::LoginResponse,
            services::Reply,
            services::ActionType,
            services::Tone,
            services::GenerateRequest,
            services::GenerateResponse,
        )
    ),
    tags(
        (name = "Authentication", description = "User authentication endpoints"),
        (name = "Generation", description = "AI reply and summary generation"),
        (name = "Replies", description = "Reply history management"),
        (name = "Account", description = "Account lifecycle"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration first
    let config = Config::load()?;

    // Initialize logging
    let log_filter = tracing_subscriber::EnvFilter::new(&config.logging.level);

    let registry = tracing_subscriber::registry().with(log_filter);

    // Add file logging if configured
    let _guard;
    if let Some(log_file) = &config.logging.file {
        let log_path = std::path::Path::new(log_file);
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let log_dir = log_path.parent().and_then(|p| p.to_str()).unwrap_or("logs");
        let file_name = log_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("mailassist.log");
        // Remove .log extension if present (rolling appender adds date suffix)
        let file_prefix = file_name.strip_suffix(".log").unwrap_or(file_name);

        let file_appender = tracing_appender::rolling::daily(log_dir, file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        _guard = guard;
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
    tracing::info!("MailAssist starting up");

    let pool = db::create_pool(&config.database.url).await?;
    tracing::info!("Database pool created successfully");

    // Separate elevated pool for identity deletion; usually the same
    // file, but the capability stays behind its own handle.
    let admin_pool = if config.database.admin_url.is_some() {
        db::create_pool(config.admin_database_url()).await?
    } else {
        pool.clone()
    };

    // Initialize core components
    let jwt_util = Arc::new(JwtUtil::new(&config.auth.jwt_secret, &config.auth.jwt_expires_in));

    let auth_service = Arc::new(AuthService::new(pool.clone(), Arc::clone(&jwt_util)));

    let llm_client: Arc<dyn InferenceClient> = Arc::new(LLMClient::new(config.llm.clone()));
    let assistant_service = Arc::new(AssistantService::new(pool.clone(), llm_client));

    let identity_store = AdminIdentityStore::new(admin_pool);
    let account_service = Arc::new(AccountService::new(pool.clone(), identity_store));

    tracing::info!("Services initialized (LLM model: {})", config.llm.model);

    let app_state = AppState {
        jwt_util: Arc::clone(&jwt_util),
        auth_service: Arc::clone(&auth_service),
        assistant_service: Arc::clone(&assistant_service),
        account_service: Arc::clone(&account_service),
    };

    let app_state_arc = Arc::new(app_state);

    // Auth state for middleware
    let auth_state = middleware::AuthState { jwt_util: Arc::clone(&jwt_util), db: pool.clone() };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .with_state(Arc::clone(&app_state_arc));

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        .route("/api/generate", post(handlers::generate::generate))
        .route("/api/replies", get(handlers::replies::list_replies))
        .route("/api/replies/:id", delete(handlers::replies::delete_reply))
        .route("/api/account", delete(handlers::account::delete_account))
        .route_layer(axum_middleware::from_fn_with_state(auth_state, middleware::auth_middleware))
        .with_state(Arc::clone(&app_state_arc));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("MailAssist listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
