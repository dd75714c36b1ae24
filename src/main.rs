use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use http::{header, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod authz;
mod config;
mod db;
mod error;
mod state;

mod auth {
    pub mod password;
    pub mod permissions;
    pub mod token;
}

mod models {
    pub mod client;
    pub mod transaction;
    pub mod user;
}

mod repositories {
    pub mod client;
    pub mod transaction;
    pub mod user;
}

mod services {
    pub mod auth;
    pub mod clients;
    pub mod export;
    pub mod ledger;
}

mod handlers {
    pub mod auth;
    pub mod clients;
    pub mod salary;
    pub mod transactions;
    pub mod users;
}

mod middleware_layer {
    pub mod auth;
}

mod validation {
    pub mod transactions;
    pub mod users;
}

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config).await?;

    db::init_schema(&state.db).await?;
    tracing::info!("✅ Database schema ready");

    services::auth::ensure_admin_user(&state.db, &config).await?;

    let allowed_origin: http::HeaderValue = config.allowed_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin([allowed_origin])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    let login_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(10)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let login_routes = Router::new()
        .route("/api/users/login", post(handlers::auth::login))
        .layer(tower_governor::GovernorLayer::new(login_governor_conf))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route(
            "/api/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/api/users/{user_id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route(
            "/api/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/api/clients/{client_id}",
            put(handlers::clients::update_client).delete(handlers::clients::delete_client),
        )
        .route(
            "/api/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/api/transactions/bulk",
            post(handlers::transactions::create_bulk),
        )
        .route(
            "/api/transactions/balance",
            get(handlers::transactions::get_balance),
        )
        .route(
            "/api/transactions/export",
            get(handlers::transactions::export_ledger),
        )
        .route(
            "/api/transactions/{transaction_id}",
            put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route(
            "/api/salary-slips/import",
            post(handlers::salary::import_salary_slips),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(login_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
