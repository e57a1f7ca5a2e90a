//! # Bot Context
//!
//! The single object threaded through the dispatcher, the scrape orchestrator
//! and the scheduler: configuration, scrape state, run state and handles to
//! the external collaborators.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::application::config_store::{ConfigStore, SCRAPE_INTERVAL};
use crate::application::scheduler::Scheduler;
use crate::application::state::{RunState, ScrapeState};
use crate::domain::errors::{PropertyError, SendError};
use crate::domain::properties::{GroupKind, PropertyChange};
use crate::domain::traits::{ChatTransport, ListingSource};

pub struct BotContext {
    pub config: RwLock<ConfigStore>,
    pub scrape: Mutex<ScrapeState>,
    pub run: RunState,
    pub scheduler: Scheduler,
    pub chat: Arc<dyn ChatTransport>,
    pub source: Arc<dyn ListingSource>,
}

impl BotContext {
    pub fn new(
        config: ConfigStore,
        chat: Arc<dyn ChatTransport>,
        source: Arc<dyn ListingSource>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config: RwLock::new(config),
            scrape: Mutex::new(ScrapeState::default()),
            run: RunState::default(),
            scheduler: Scheduler::default(),
            chat,
            source,
        })
    }

    /// Typed set on a property group. A successful change of the scrape
    /// interval rearms the scheduler with the new value.
    pub async fn set_property(
        self: &Arc<Self>,
        group: GroupKind,
        key: &str,
        raw: &str,
    ) -> Result<PropertyChange, PropertyError> {
        let change = {
            let mut config = self.config.write().await;
            let change = config.set(group, key, raw)?;
            // The armed period always matches the stored interval
            if group == GroupKind::Bot && key == SCRAPE_INTERVAL {
                self.scheduler.arm(self, config.scrape_interval());
            }
            change
        };
        tracing::info!(
            "Property {} {} changed: {} -> {}",
            group.command(),
            change.key,
            change.old,
            change.new
        );
        Ok(change)
    }

    /// Sends to a thread, returning the transport's failure to the caller.
    pub async fn send(&self, thread_id: &str, text: &str) -> Result<(), SendError> {
        self.chat.send(thread_id, text).await
    }

    /// Sends to a thread; a failure is logged and not retried.
    pub async fn notify(&self, thread_id: &str, text: &str) {
        if let Err(e) = self.chat.send(thread_id, text).await {
            tracing::warn!("Dropping message to {}: {}", thread_id, e);
        }
    }
}
