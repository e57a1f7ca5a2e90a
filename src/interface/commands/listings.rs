//! # List Command
//!
//! Handles `list`: re-sends the results of the last completed scrape.

use crate::application::context::BotContext;
use crate::application::scrape::format_listings;
use crate::domain::errors::SendError;
use crate::strings::messages;

pub async fn handle_list(ctx: &BotContext, thread_id: &str) -> Result<(), SendError> {
    let text = {
        let state = ctx.scrape.lock().await;
        format_listings(
            &messages::last_ads_header(state.last_results.len()),
            &state.last_results,
            ctx.source.as_ref(),
        )
    };
    ctx.send(thread_id, &text).await
}
