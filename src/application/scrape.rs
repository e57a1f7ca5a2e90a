//! # Scrape Orchestrator
//!
//! Queries the listing source, applies the watermark filter and commits the
//! outcome to `ScrapeState`. Shared by the `scrape` command and scheduled ticks.

use chrono::{DateTime, Utc};

use crate::application::context::BotContext;
use crate::application::watermark::filter_since;
use crate::domain::errors::{QueryError, SendError};
use crate::domain::properties::GroupKind;
use crate::domain::traits::ListingSource;
use crate::domain::types::Listing;
use crate::strings::messages;

/// Listings published after `watermark`, plus the new watermark.
///
/// The new watermark is the completion time rather than the newest listing
/// date, so listings the source indexes late are still picked up next time.
pub async fn scrape_since(
    ctx: &BotContext,
    watermark: DateTime<Utc>,
) -> Result<(Vec<Listing>, DateTime<Utc>), QueryError> {
    tracing::info!("Scraping new ads since {}", watermark);

    // Snapshot so the lock is not held across the query.
    let (preferences, parameters) = {
        let config = ctx.config.read().await;
        (
            config.group(GroupKind::Source).clone(),
            config.group(GroupKind::Query).clone(),
        )
    };

    let listings = ctx.source.query(&preferences, &parameters).await?;
    let fresh = filter_since(listings, watermark);
    let completed_at = Utc::now();

    tracing::info!("{} ads scraped", fresh.len());
    Ok((fresh, completed_at))
}

/// Acknowledge, scrape, commit and announce. Query failures are reported to
/// the thread and leave `ScrapeState` untouched.
pub async fn run_full_cycle(ctx: &BotContext, thread_id: &str) -> Result<(), SendError> {
    ctx.notify(thread_id, messages::WORKING).await;

    let watermark = ctx.scrape.lock().await.last_scrape;

    match scrape_since(ctx, watermark).await {
        Ok((listings, completed_at)) => {
            let summary = format_listings(
                &messages::new_ads_header(listings.len()),
                &listings,
                ctx.source.as_ref(),
            );
            ctx.scrape.lock().await.commit(listings, completed_at);
            ctx.send(thread_id, &summary).await
        }
        Err(e) => {
            tracing::error!("Error scraping ads: {}", e);
            ctx.send(thread_id, messages::SCRAPE_FAILED).await
        }
    }
}

pub fn format_listings(header: &str, listings: &[Listing], source: &dyn ListingSource) -> String {
    let mut output = String::from(header);
    for listing in listings {
        output.push('\n');
        output.push_str(&source.render(listing));
    }
    output
}
