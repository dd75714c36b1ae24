use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The secret used to sign session tokens.
    pub jwt_secret: Zeroizing<String>,
    /// The lifetime of a session token in hours.
    pub token_lifetime_hours: i64,
    /// The origin allowed to call the API from a browser.
    pub allowed_origin: String,
    /// Credentials used to seed the first admin user, if set.
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: Option<Zeroizing<String>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            jwt_secret: Zeroizing::new(jwt_secret),
            token_lifetime_hours: env::var("TOKEN_LIFETIME_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME_HOURS")?,
            allowed_origin: env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@admin.com".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").ok().map(Zeroizing::new),
        })
    }
}
