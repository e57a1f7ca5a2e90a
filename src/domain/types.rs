//! # Domain Types
//!
//! Common data structures passed between the chat transport, the listing source
//! and the application logic.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// One result returned by the listing source.
///
/// Only `published` is interpreted by the bot; the remaining fields are display
/// payload handed back to the source for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Listing {
    #[cfg(test)]
    pub fn new(title: impl Into<String>, published: Option<DateTime<Utc>>) -> Self {
        Self {
            title: title.into(),
            link: None,
            description: None,
            price: None,
            published,
        }
    }
}

/// A plain-text chat message delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    /// Conversation the message arrived in; replies go back here.
    pub thread_id: String,
    pub sender: String,
}

/// Period of the scheduled scrape.
///
/// Stored as signed milliseconds in the bot properties; any negative value
/// disables the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Every(Duration),
    Disabled,
}

impl Interval {
    pub fn from_millis(ms: i64) -> Self {
        if ms < 0 {
            Interval::Disabled
        } else {
            // A zero period would spin; clamp to one millisecond.
            Interval::Every(Duration::from_millis(ms.max(1) as u64))
        }
    }
}
