//! # Help Command
//!
//! Handles the `help` command.
//! Property commands are only listed while remote administration is enabled.

use crate::application::context::BotContext;
use crate::domain::errors::SendError;

pub async fn handle_help(ctx: &BotContext, thread_id: &str) -> Result<(), SendError> {
    let text = {
        let config = ctx.config.read().await;
        crate::strings::help::main(config.bot_name(), config.remote_admin())
    };
    ctx.send(thread_id, &text).await
}
