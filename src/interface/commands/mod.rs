//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g. `list`, `info`, `botprop`).
//! These handlers are invoked by the Router.

pub mod help;
pub mod info;
pub mod listings;
pub mod property;
