//! # Matrix Transport Adapter
//!
//! Implements the `ChatTransport` trait for the Matrix protocol using the `matrix_sdk`.
//! Room ids double as thread ids: inbound messages carry the room they arrived in
//! and replies are sent back to that room.

use async_trait::async_trait;
use matrix_sdk::event_handler::EventHandlerHandle;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::member::{MembershipState, StrippedRoomMemberEvent};
use matrix_sdk::ruma::events::room::message::{
    MessageType, RoomMessageEventContent, SyncRoomMessageEvent,
};
use matrix_sdk::ruma::RoomId;
use matrix_sdk::{config::SyncSettings, Client};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::config::MatrixConfig;
use crate::domain::errors::{SendError, StartError};
use crate::domain::traits::{ChatConnector, ChatTransport};
use crate::domain::types::InboundMessage;
use crate::strings::logs;

/// Logs in with the credentials in `matrix.yaml`.
pub struct MatrixConnector;

#[async_trait]
impl ChatConnector for MatrixConnector {
    async fn connect(&self, credentials: &Path) -> Result<Arc<dyn ChatTransport>, StartError> {
        let config =
            MatrixConfig::load(credentials).map_err(|e| StartError::Connect(format!("{e:#}")))?;
        let transport = MatrixTransport::login(&config)
            .await
            .map_err(|e| StartError::Connect(format!("{e:#}")))?;
        Ok(Arc::new(transport))
    }
}

pub struct MatrixTransport {
    client: Client,
    handlers: Mutex<Vec<EventHandlerHandle>>,
    sync: Mutex<Option<JoinHandle<()>>>,
}

impl MatrixTransport {
    pub async fn login(config: &MatrixConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .homeserver_url(&config.homeserver)
            .build()
            .await?;

        client
            .matrix_auth()
            .login_username(&config.username, &config.password)
            .send()
            .await?;
        tracing::info!("{}", logs::logged_in(&config.username));

        if let Some(name) = &config.display_name {
            tracing::info!("{}", logs::setting_display_name(name));
            if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
                tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
            }
        }

        Ok(Self {
            client,
            handlers: Mutex::new(Vec::new()),
            sync: Mutex::new(None),
        })
    }
}

#[async_trait]
impl ChatTransport for MatrixTransport {
    async fn listen(&self, inbound: mpsc::Sender<InboundMessage>) -> Result<(), StartError> {
        // Ignore history replayed by the initial sync
        let attached_at = SystemTime::now();

        let messages = self
            .client
            .add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
                let inbound = inbound.clone();
                async move {
                    let Some(original_msg) = ev.as_original() else {
                        return;
                    };
                    let ts = ev.origin_server_ts();
                    let event_time = UNIX_EPOCH + Duration::from_millis(ts.get().into());
                    if event_time < attached_at {
                        return;
                    }
                    if original_msg.sender == room.own_user_id() {
                        return;
                    }

                    if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                        tracing::debug!(
                            "Received message from {}: {}",
                            original_msg.sender,
                            text_content.body
                        );
                        let message = InboundMessage {
                            text: text_content.body.clone(),
                            thread_id: room.room_id().to_string(),
                            sender: original_msg.sender.to_string(),
                        };
                        if inbound.send(message).await.is_err() {
                            tracing::debug!("Inbound channel closed, dropping message");
                        }
                    }
                }
            });

        // Handle Invites
        let invites = self
            .client
            .add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
                if ev.content.membership == MembershipState::Invite {
                    if let Err(e) = room.join().await {
                        tracing::warn!("Failed to join {}: {}", room.room_id(), e);
                    }
                }
            });

        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend([messages, invites]);

        let sync_client = self.client.clone();
        let sync = tokio::spawn(async move {
            tracing::info!("{}", logs::SYNC_LOOP_START);
            if let Err(e) = sync_client.sync(SyncSettings::default()).await {
                tracing::error!("{}", logs::sync_loop_fail(&e.to_string()));
            }
        });
        *self.sync.lock().unwrap_or_else(PoisonError::into_inner) = Some(sync);

        Ok(())
    }

    async fn send(&self, thread_id: &str, text: &str) -> Result<(), SendError> {
        let room_id = RoomId::parse(thread_id).map_err(|e| SendError(e.to_string()))?;
        let room = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| SendError(format!("not a member of {thread_id}")))?;

        tracing::info!("Bot sending message to {}: {}", thread_id, text);
        room.send(RoomMessageEventContent::text_plain(text))
            .await
            .map(|_| ())
            .map_err(|e| SendError(e.to_string()))
    }

    async fn detach(&self) {
        let handlers: Vec<_> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        // Dropping the message handler drops its inbound sender
        for handle in handlers {
            self.client.remove_event_handler(handle);
        }

        if let Some(sync) = self.sync.lock().unwrap_or_else(PoisonError::into_inner).take() {
            sync.abort();
        }
        tracing::info!("Detached from Matrix");
    }
}
