//! # Command Router
//!
//! Routes inbound chat messages to the appropriate command handler (in `interface/commands`).
//! Messages not addressed to the bot are ignored. Property commands are only
//! visible while `remoteAdmin` is enabled; otherwise they answer exactly like
//! an unrecognised command.

use std::sync::Arc;

use crate::application::context::BotContext;
use crate::application::parsing::{is_admin_keyword, parse_command, Command};
use crate::application::scrape;
use crate::domain::errors::SendError;
use crate::domain::types::InboundMessage;
use crate::interface::commands;
use crate::strings::messages;

pub struct CommandRouter {
    ctx: Arc<BotContext>,
}

impl CommandRouter {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self { ctx }
    }

    pub async fn route(&self, message: &InboundMessage) -> Result<(), SendError> {
        let (bot_name, remote_admin) = {
            let config = self.ctx.config.read().await;
            (config.bot_name().to_string(), config.remote_admin())
        };

        let Some(parsed) = parse_command(&message.text, &bot_name) else {
            return Ok(());
        };
        let thread = message.thread_id.as_str();

        let command = match parsed {
            Ok(cmd) if cmd.is_admin() && !remote_admin => Command::Unknown(cmd.name().to_string()),
            Ok(cmd) => cmd,
            Err(e) if is_admin_keyword(e.command()) && !remote_admin => {
                Command::Unknown(e.command().to_string())
            }
            Err(e) => {
                tracing::info!("Rejected command from {}: {}", message.sender, e);
                return self.ctx.send(thread, &e.to_string()).await;
            }
        };

        tracing::info!(
            "Router dispatching cmd='{}' thread='{}' sender='{}'",
            command.name(),
            thread,
            message.sender
        );

        match command {
            Command::List => commands::listings::handle_list(&self.ctx, thread).await,
            Command::Scrape => scrape::run_full_cycle(&self.ctx, thread).await,
            Command::Info => commands::info::handle_info(&self.ctx, thread).await,
            Command::Help => commands::help::handle_help(&self.ctx, thread).await,
            Command::Property { group, key, value } => {
                commands::property::handle_property(&self.ctx, thread, group, &key, value.as_deref())
                    .await
            }
            Command::Unknown(name) => {
                self.ctx
                    .send(thread, &messages::unknown_command(&name))
                    .await
            }
        }
    }
}
