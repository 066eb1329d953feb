use sea_orm::Database;
use tracing::info;

use dietcare_api::config::ApiConfig;
use dietcare_api::router::build_router;
use dietcare_api::state::AppState;
use dietcare_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("dietcare_api=info,tower_http=info");

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        jwt_secret: config.jwt_secret,
        session_ttl_secs: config.session_ttl_secs,
        cookie_secure: config.cookie_secure,
        rotate_code_on_weight: config.rotate_code_on_weight,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        rotate_code_on_weight = config.rotate_code_on_weight,
        "dietcare api listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
