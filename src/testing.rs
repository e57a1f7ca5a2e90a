// Test mocks for the bot core.
//
// - RecordingTransport (ChatTransport): records every send, lets tests inject
//   inbound messages once `listen` has been called
// - StaticConnector / FailingConnector (ChatConnector)
// - ScriptedSource (ListingSource): queued query results, optional delay

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::application::config_store::ConfigStore;
use crate::application::context::BotContext;
use crate::domain::errors::{QueryError, SendError, StartError};
use crate::domain::properties::PropertyGroup;
use crate::domain::traits::{ChatConnector, ChatTransport, ListingSource};
use crate::domain::types::{InboundMessage, Listing};

// ---------------------------------------------------------------------------
// RecordingTransport
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    inbound: Mutex<Option<mpsc::Sender<InboundMessage>>>,
    detached: AtomicBool,
    fail_sends: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(thread_id, text)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, thread_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(t, _)| t == thread_id)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Pushes a message as if it arrived from the chat. Returns false when
    /// nothing is listening.
    pub async fn deliver(&self, thread_id: &str, text: &str) -> bool {
        let tx = self.inbound.lock().unwrap().clone();
        match tx {
            Some(tx) => tx.send(message(thread_id, text)).await.is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn listen(&self, inbound: mpsc::Sender<InboundMessage>) -> Result<(), StartError> {
        *self.inbound.lock().unwrap() = Some(inbound);
        Ok(())
    }

    async fn send(&self, thread_id: &str, text: &str) -> Result<(), SendError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SendError("transport offline".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((thread_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
        self.inbound.lock().unwrap().take();
    }
}

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

pub struct StaticConnector(pub Arc<RecordingTransport>);

#[async_trait]
impl ChatConnector for StaticConnector {
    async fn connect(&self, _credentials: &Path) -> Result<Arc<dyn ChatTransport>, StartError> {
        Ok(self.0.clone())
    }
}

pub struct FailingConnector;

#[async_trait]
impl ChatConnector for FailingConnector {
    async fn connect(&self, _credentials: &Path) -> Result<Arc<dyn ChatTransport>, StartError> {
        Err(StartError::Connect("login rejected".to_string()))
    }
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// Returns queued results in order; an empty queue yields no listings.
/// Renders a listing as its title.
#[derive(Default)]
pub struct ScriptedSource {
    results: Mutex<VecDeque<Result<Vec<Listing>, QueryError>>>,
    last_query: Mutex<Option<(PropertyGroup, PropertyGroup)>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn push_ok(&self, listings: Vec<Listing>) {
        self.results.lock().unwrap().push_back(Ok(listings));
    }

    pub fn push_err(&self, reason: &str) {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(QueryError(reason.to_string())));
    }

    /// Every query sleeps this long (tokio time) before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<(PropertyGroup, PropertyGroup)> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingSource for ScriptedSource {
    async fn query(
        &self,
        preferences: &PropertyGroup,
        parameters: &PropertyGroup,
    ) -> Result<Vec<Listing>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some((preferences.clone(), parameters.clone()));

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn render(&self, listing: &Listing) -> String {
        listing.title.clone()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn ad_prefs() -> Value {
    json!({"locationId": 1700185, "categoryId": 644})
}

pub fn search_params() -> Value {
    json!({"keywords": "bike", "maxPrice": 250.0})
}

pub fn config(bot: Value) -> ConfigStore {
    ConfigStore::from_documents(&bot, &ad_prefs(), &search_params()).unwrap()
}

/// Context over recording mocks. The run state is left stopped.
pub fn context(bot: Value) -> (Arc<BotContext>, Arc<RecordingTransport>, Arc<ScriptedSource>) {
    let chat = RecordingTransport::new();
    let source = Arc::new(ScriptedSource::default());
    let ctx = BotContext::new(config(bot), chat.clone(), source.clone());
    (ctx, chat, source)
}

pub fn message(thread_id: &str, text: &str) -> InboundMessage {
    InboundMessage {
        text: text.to_string(),
        thread_id: thread_id.to_string(),
        sender: "@tester:example.org".to_string(),
    }
}

/// Writes the three property documents into `dir`.
pub fn write_config(dir: &Path, bot: &Value) {
    std::fs::write(dir.join("botprops.json"), bot.to_string()).unwrap();
    std::fs::write(dir.join("adprefs.json"), ad_prefs().to_string()).unwrap();
    std::fs::write(dir.join("searchparams.json"), search_params().to_string()).unwrap();
}
