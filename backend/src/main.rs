//! Backend entry-point: wires the REST endpoints, storage adapters, and
//! OpenAPI docs.
//!
//! With `DATABASE_URL` set the server runs against PostgreSQL; without it
//! the in-memory adapters back the API, which is enough for local
//! exploration and demos.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use chrono::Duration;
use rand::RngCore;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::domain::book_page_service::BookPageService;
use backend::domain::book_service::BookService;
use backend::domain::ports::TokenCodec;
use backend::domain::user_service::UserService;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http;
use backend::inbound::http::health::healthz;
use backend::inbound::http::state::HttpState;
use backend::outbound::jwt::JwtTokenCodec;
use backend::outbound::password::BcryptPasswordHasher;
use backend::outbound::persistence::{
    DbPool, DieselBookPageRepository, DieselBookRepository, DieselRefreshTokenRepository,
    DieselUserRepository, PoolConfig,
};

fn load_jwt_secret() -> std::io::Result<Vec<u8>> {
    let path = env::var("JWT_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/jwt_secret".into());
    match std::fs::read(&path) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        Ok(_) => Err(std::io::Error::other(format!(
            "jwt secret at {path} is empty"
        ))),
        Err(e) => {
            let allow_dev = env::var("AUTH_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %path, error = %e, "using ephemeral JWT secret (dev only)");
                let mut secret = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut secret);
                Ok(secret)
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read jwt secret at {path}: {e}"
                )))
            }
        }
    }
}

fn duration_from_env(name: &str, default: i64, unit: fn(i64) -> Duration) -> Duration {
    let value = env::var(name)
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default);
    unit(value)
}

async fn build_state(secret: &[u8]) -> std::io::Result<HttpState> {
    let access_ttl = duration_from_env("ACCESS_TTL_MINUTES", 15, Duration::minutes);
    let refresh_ttl = duration_from_env("REFRESH_TTL_DAYS", 14, Duration::days);

    let Ok(database_url) = env::var("DATABASE_URL") else {
        warn!("DATABASE_URL is not set; serving from in-memory storage");
        return Ok(HttpState::in_memory(
            secret,
            access_ttl,
            refresh_ttl,
            bcrypt::DEFAULT_COST,
        ));
    };

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    let tokens: Arc<dyn TokenCodec> = Arc::new(JwtTokenCodec::new(secret, access_ttl));
    let books = Arc::new(DieselBookRepository::new(pool.clone()));
    let users = UserService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselRefreshTokenRepository::new(pool.clone())),
        Arc::new(BcryptPasswordHasher::new()),
        tokens.clone(),
        refresh_ttl,
    );
    Ok(HttpState::new(
        BookService::new(books.clone()),
        BookPageService::new(books, Arc::new(DieselBookPageRepository::new(pool))),
        users,
        tokens,
    ))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let secret = load_jwt_secret()?;
    let state = web::Data::new(build_state(&secret).await?);
    let bind = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .configure(http::configure_api)
            .service(healthz);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        #[cfg(not(debug_assertions))]
        let app = app;

        app
    })
    .bind(bind)?
    .run()
    .await
}
