//! # Property Commands
//!
//! Handles `botprop`, `adpref` and `searchparam`: read a property when no
//! value is given, otherwise perform a typed set and echo old and new values.

use std::sync::Arc;

use crate::application::context::BotContext;
use crate::application::parsing::check_value_arity;
use crate::domain::errors::SendError;
use crate::domain::properties::{GroupKind, PropertyKind};
use crate::strings::messages;

pub async fn handle_property(
    ctx: &Arc<BotContext>,
    thread_id: &str,
    group: GroupKind,
    key: &str,
    value: Option<&str>,
) -> Result<(), SendError> {
    let reply = match value {
        None => {
            let config = ctx.config.read().await;
            match config.get(group, key) {
                Ok(current) => messages::property_value(key, &current.to_string()),
                Err(e) => e.to_string(),
            }
        }
        Some(raw) => {
            let kind = ctx.config.read().await.get(group, key).map(|v| v.kind());
            // Strings are stored as typed; every other kind is one trimmed token
            let raw = match kind {
                Ok(kind) if kind != PropertyKind::Text => {
                    if let Err(e) = check_value_arity(group.command(), raw) {
                        return ctx.send(thread_id, &e.to_string()).await;
                    }
                    raw.trim()
                }
                _ => raw,
            };

            match ctx.set_property(group, key, raw).await {
                Ok(change) => messages::property_changed(
                    &change.key,
                    &change.old.to_string(),
                    &change.new.to_string(),
                ),
                Err(e) => {
                    tracing::info!("Property {} {} not changed: {}", group.command(), key, e);
                    e.to_string()
                }
            }
        }
    };

    ctx.send(thread_id, &reply).await
}
