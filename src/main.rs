use axum::Server;
use clap::{Arg, ArgAction, Command, value_parser};
use shift_backend::{
    AppState,
    config::{Config, IdentityProviderKind},
    db::store::{MemoryStore, PgStore, Store},
    error::AppError,
    init_tracing,
    middleware::auth::JwtIdentityProvider,
    routes, seed,
};
use std::net::SocketAddr;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("shift-backend")
        .about("Shift scheduling API server")
        .arg(
            Arg::new("seed")
                .long("seed")
                .action(ArgAction::SetTrue)
                .help("Load demo data into the store before serving"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Overrides SERVER_HOST"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .help("Overrides SERVER_PORT"),
        )
        .arg(
            Arg::new("issue-token")
                .long("issue-token")
                .value_name("EMAIL")
                .help("Log a bearer token for this user at startup (JWT identity only)"),
        )
}

/// Mints a token for an existing user so the JWT provider can be exercised
/// without a separate login service.
async fn issue_dev_token(store: &dyn Store, config: &Config, email: &str) -> Result<(), AppError> {
    let auth = config.auth();
    if auth.provider != IdentityProviderKind::Jwt {
        tracing::warn!("--issue-token ignored: IDENTITY_PROVIDER is not jwt");
        return Ok(());
    }
    let email = email.trim().to_lowercase();
    let user = store
        .list_users(None)
        .await?
        .into_iter()
        .find(|u| u.email == email)
        .ok_or_else(|| AppError::not_found(format!("User {} not found", email)))?;
    let token = JwtIdentityProvider::new(&auth).issue_token(&user)?;
    tracing::info!(user_id = %user.id, %token, "issued bearer token");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let mut config = Config::from_env()?;
    if let Some(host) = matches.get_one::<String>("host") {
        config.server_host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server_port = *port;
    }
    init_tracing(&config);

    let store: Arc<dyn Store> = match config.database() {
        Some(db) => {
            let store = PgStore::connect(&db)?;
            tracing::info!(max_connections = db.max_connections, "using PostgreSQL store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if matches.get_flag("seed") {
        let summary = seed::seed_demo(store.as_ref()).await?;
        tracing::info!(shifts = summary.shifts, users = summary.users, "seed finished");
    }
    if let Some(email) = matches.get_one::<String>("issue-token") {
        issue_dev_token(store.as_ref(), &config, email).await?;
    }

    let addr: SocketAddr = config.server_address().parse()?;
    let state = Arc::new(AppState::new(store, config));
    tracing::info!(
        %addr,
        identity = state.identity.name(),
        "server listening"
    );

    let app = routes::create_router(state);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}
