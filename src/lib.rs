//! Storefront Orders
//!
//! Backend order service for an e-commerce storefront.
//!
//! ## Features
//! - Order placement with a computed 4-stage delivery schedule
//! - Best-effort post-order side effects (cart clear, activity log,
//!   inventory adjustment) on a bounded background queue
//! - Confirmation emails published to a NATS mail relay
//! - Bearer-token authenticated order listing, tracking and payment update

pub mod auth;
pub mod config;
pub mod effects;
pub mod error;
pub mod models;
pub mod notify;
pub mod routes;
pub mod schedule;
pub mod state;
pub mod store;

pub use auth::{CurrentUser, JwtKeys};
pub use config::Config;
pub use error::ApiError;
pub use models::{Order, OrderStatus};
pub use schedule::delivery_schedule;
pub use state::AppState;
