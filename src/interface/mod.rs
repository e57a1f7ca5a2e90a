//! # Interface Layer
//!
//! The user-facing chat command surface.

pub mod commands;
