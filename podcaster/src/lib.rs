//! HTTP backend of the podcast generator.
//!
//! Exposes script generation, speech synthesis and voice previews as JSON
//! endpoints behind a per-address rate limit and a single-origin CORS policy.

pub mod config;
pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod web;

pub use config::Config;
pub use error::ApiError;
pub use logging::init_logging;
pub use rate_limit::RateLimiter;
pub use web::{AppState, app, build_app, cors_layer};
