//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat, listing source).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::errors::{QueryError, SendError, StartError};
use crate::domain::properties::PropertyGroup;
use crate::domain::types::{InboundMessage, Listing};

/// An attached chat session (e.g., Matrix, Slack, Console)
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Start forwarding inbound messages into `inbound`.
    async fn listen(&self, inbound: mpsc::Sender<InboundMessage>) -> Result<(), StartError>;

    /// Send a plain-text message to a thread
    async fn send(&self, thread_id: &str, text: &str) -> Result<(), SendError>;

    /// Stop delivering messages and drop the `inbound` sender.
    async fn detach(&self);
}

/// Produces an attached session from a credentials location.
#[async_trait]
pub trait ChatConnector: Send + Sync {
    async fn connect(&self, credentials: &Path) -> Result<Arc<dyn ChatTransport>, StartError>;
}

/// Common trait for listing sources
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Query the source with the current preferences and parameters
    async fn query(
        &self,
        preferences: &PropertyGroup,
        parameters: &PropertyGroup,
    ) -> Result<Vec<Listing>, QueryError>;

    /// One-line (or short multi-line) display form of a listing
    fn render(&self, listing: &Listing) -> String;
}
