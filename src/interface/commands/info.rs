//! # Info Command
//!
//! Handles `info`: bot name, schedule, last scrape and all three property groups.

use crate::application::context::BotContext;
use crate::domain::errors::SendError;
use crate::domain::properties::{GroupKind, PropertyGroup};
use crate::domain::types::Interval;
use crate::strings::messages;

pub async fn handle_info(ctx: &BotContext, thread_id: &str) -> Result<(), SendError> {
    let (last_scrape, found) = {
        let state = ctx.scrape.lock().await;
        let last = state
            .has_scraped()
            .then(|| state.last_scrape.to_rfc3339());
        (last, state.last_results.len())
    };

    let text = {
        let config = ctx.config.read().await;
        let interval = match config.scrape_interval() {
            Interval::Every(period) => format!("{}ms", period.as_millis()),
            Interval::Disabled => "disabled".to_string(),
        };

        let mut lines = vec![
            messages::section(config.bot_name()),
            format!("Scrape interval: {interval}"),
            format!("Last scrape: {}", last_scrape.as_deref().unwrap_or("never")),
            format!("Ads found at last scrape: {found}"),
        ];
        for (title, kind) in [
            ("bot properties", GroupKind::Bot),
            ("ad preferences", GroupKind::Source),
            ("search parameters", GroupKind::Query),
        ] {
            lines.push(String::new());
            lines.push(messages::section(title));
            push_group(&mut lines, config.group(kind));
        }
        lines.join("\n")
    };

    ctx.send(thread_id, &text).await
}

fn push_group(lines: &mut Vec<String>, group: &PropertyGroup) {
    for (key, value) in group.iter() {
        lines.push(messages::property_value(key, &value.to_string()));
    }
}
