#[macro_use]
mod wrapper;
pub use wrapper::*;

use crate::error::ServiceError;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod api;
mod domain;
mod infra;
mod initializer;
mod repository;
mod schema;
#[cfg(test)]
mod test_util;

#[derive(Parser, Debug)]
#[command(name = "tweet-api", version, about = "REST backend for tweets, comments and likes")]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 5)]
    database_pool_size: u32,

    /// Twitter API bearer token
    #[arg(long, env = "BEARER_TOKEN", default_value = "")]
    bearer_token: String,

    #[arg(long, env = "TWITTER_API_URL", default_value = "https://api.twitter.com/2")]
    twitter_api_url: String,

    /// Message catalog for error and success messages
    #[arg(long, env = "LOCALE", default_value = "en")]
    locale: String,

    /// Comma separated `token=userId` pairs accepted as bearer tokens
    #[arg(long, env = "AUTH_TOKENS", default_value = "")]
    auth_tokens: String,

    /// Listen address for `serve`
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000", global = true)]
    bind: SocketAddr,

    /// Defaults to `serve`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve,
    /// Register a user and print its id
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
}

impl Cli {
    fn config(&self) -> initializer::Config {
        initializer::Config {
            db_url: self.database_url.clone(),
            db_pool_size: self.database_pool_size,
            bearer_token: self.bearer_token.clone(),
            twitter_api_url: self.twitter_api_url.clone(),
            locale: self.locale.clone(),
            auth_tokens: self.auth_tokens.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let app = initializer::new(cli.config()).map_err(ServiceError::into_inner)?;
    app.infras
        .ensure_initialized()
        .await
        .map_err(ServiceError::into_inner)?;

    match cli.command {
        Some(Command::CreateUser {
            name,
            username,
            email,
        }) => create_user(&app, name, username, email).await,
        Some(Command::Serve) | None => serve(&app, cli.bind).await,
    }
}

async fn serve(app: &initializer::AppContext, bind: SocketAddr) -> anyhow::Result<()> {
    let router = axum::Router::new()
        .nest("/api/tweets", api::router(api::ApiState::from(app)))
        .layer(CorsLayer::permissive());

    tracing::info!(%bind, "listening");
    axum::Server::bind(&bind)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn create_user(
    app: &initializer::AppContext,
    name: String,
    username: String,
    email: String,
) -> anyhow::Result<()> {
    use domain::interface::IUserRepository;

    let user = domain::model::User::new(name, username, email);
    let id = user.id.clone();
    app.repository
        .user
        .save(user)
        .await
        .map_err(ServiceError::into_inner)?;
    tracing::info!(user = %id, "user created");
    println!("{}", id);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
