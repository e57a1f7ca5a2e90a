//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatTransport, ListingSource).

pub mod matrix;
pub mod rss;
