//! # Application Layer
//!
//! Contains the core logic and orchestration of the bot.
//! This includes the config store, scrape orchestration, scheduling, command routing and lifecycle.

pub mod config_store;
pub mod context;
pub mod controller;
pub mod logging;
pub mod parsing;
pub mod router;
pub mod scheduler;
pub mod scrape;
pub mod state;
pub mod watermark;
