//! # Watermark Filter
//!
//! Keeps only listings published strictly after the cutoff. Undated listings
//! are always dropped so stale entries without a date are never re-announced.

use chrono::{DateTime, Utc};

use crate::domain::types::Listing;

pub fn filter_since(listings: Vec<Listing>, cutoff: DateTime<Utc>) -> Vec<Listing> {
    let total = listings.len();
    let fresh: Vec<Listing> = listings
        .into_iter()
        .filter(|l| l.published.is_some_and(|ts| ts > cutoff))
        .collect();
    tracing::debug!("Watermark {} kept {}/{} listings", cutoff, fresh.len(), total);
    fresh
}
