//! Environment-driven configuration.

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// NATS server for the mail relay; notifications are dropped when unset.
    pub nats_url: Option<String>,
    pub mail_from: String,
    /// Capacity of the post-order side-effect queue.
    pub effect_queue_depth: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8083),
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            nats_url: std::env::var("NATS_URL").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "orders@storefront.example".into()),
            effect_queue_depth: std::env::var("EFFECT_QUEUE_DEPTH")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(256),
        })
    }
}
