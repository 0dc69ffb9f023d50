use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;

use config::Config;
use middleware::rate_limit::{self, RateLimitState};
use services::gemini::{GeminiClient, GenerativeProvider};
use services::speech::{GoogleSpeechClient, SpeechProvider};

/// Provider clients are built once at startup and shared read-only across
/// request handlers; `None` means the credential is not configured and the
/// affected endpoints serve their local fallbacks.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub rate_limiter: RateLimitState,
    pub ai: Option<Arc<dyn GenerativeProvider>>,
    pub speech: Option<Arc<dyn SpeechProvider>>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mannmitra_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();

    // Database
    let db = db::create_pool(&config.database_url).await;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let ai: Option<Arc<dyn GenerativeProvider>> = config
        .gemini_api_key
        .clone()
        .map(|key| {
            Arc::new(GeminiClient::new(key, config.gemini_model.clone()))
                as Arc<dyn GenerativeProvider>
        });
    if ai.is_none() {
        tracing::warn!("GEMINI_API_KEY not found. AI features will use fallback responses.");
    }

    let speech: Option<Arc<dyn SpeechProvider>> = config
        .speech_api_key
        .clone()
        .map(|key| Arc::new(GoogleSpeechClient::new(key)) as Arc<dyn SpeechProvider>);
    if speech.is_none() {
        tracing::warn!("SPEECH_API_KEY not found. Speech-to-text will return placeholders.");
    }

    let rate_limiter = RateLimitState::new();

    let state = AppState {
        db,
        rate_limiter,
        ai,
        speech,
    };

    // Provider-calling routes sit behind the per-IP limiter so abuse is cut
    // off before any provider cost.
    let ai_routes = Router::new()
        .route("/api/chat", post(handlers::chat::get_chat_response))
        .route(
            "/api/speech-to-text",
            post(handlers::speech::speech_to_text),
        )
        .route(
            "/api/reports/upload",
            post(handlers::reports::upload_report),
        )
        .route(
            "/api/wellness-plan",
            post(handlers::reports::generate_wellness_plan),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_ai,
        ));

    let api_routes = Router::new()
        .route("/api/moods", post(handlers::moods::save_mood_entry))
        .route(
            "/api/moods/recent",
            post(handlers::moods::get_recent_moods),
        )
        .route("/api/stats", post(handlers::stats::get_quick_stats))
        .route("/api/tips", post(handlers::tips::get_wellness_tips))
        .route(
            "/api/text-to-speech",
            post(handlers::speech::text_to_speech),
        )
        .route(
            "/api/diary/reflection",
            post(handlers::diary::diary_reflection),
        )
        .route("/api/helplines", get(handlers::helplines::list_helplines));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    // Purge expired rate-limit windows in the background
    rate_limit::spawn_cleanup_worker(state.rate_limiter.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ai_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    // Use into_make_service_with_connect_info to provide client IP for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .unwrap();
}
