mod handlers;
mod server;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use session_trust_axum::{
    AuthState, GateConfig, InMemoryAccountStore, SessionTrust, auth_router, edge_gate,
    require_session, require_settings_reauth,
};

use crate::server::{init_tracing, spawn_http_server};

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("demo_social");

    let trust = SessionTrust::from_env()?;
    let gate = GateConfig::from_env();

    let accounts = InMemoryAccountStore::new();
    let demo_account = dotenvy::var("DEMO_ACCOUNT").unwrap_or_else(|_| "demo".to_string());
    let demo_password =
        dotenvy::var("DEMO_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());
    let demo = accounts
        .insert_registered(&demo_account, &demo_password)
        .await?;
    tracing::info!(user_id = %demo.id, "Seeded demo account '{demo_account}'");

    let state = AuthState::new(trust, Arc::new(accounts), gate);
    let app = app(state);

    let port = match dotenvy::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => DEFAULT_PORT,
    };
    spawn_http_server(port, app).await?;
    Ok(())
}

fn app(state: AuthState) -> Router {
    // For a single route the route-level layer runs inside the router-level one,
    // so require_session has stored the identity before the settings gate runs.
    let api = Router::new()
        .route("/api/me", get(handlers::me))
        .route(
            "/api/settings/email",
            post(handlers::change_email)
                .route_layer(from_fn_with_state(state.clone(), require_settings_reauth)),
        )
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .merge(api)
        .with_state(state.clone())
        .nest("/auth", auth_router(state.clone()))
        .layer(from_fn_with_state(state, edge_gate))
}
