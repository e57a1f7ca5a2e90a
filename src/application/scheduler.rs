//! # Scheduler
//!
//! Owns at most one recurring scrape timer. Arming always cancels the previous
//! timer first. A cancelled timer never starts another tick, but a tick that is
//! already running is allowed to finish and announce its results.
//!
//! The period is read from the bot properties after every tick, so a change
//! made while a tick is in flight applies from the following tick on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::context::BotContext;
use crate::application::scrape;
use crate::domain::types::Interval;
use crate::strings::messages;

struct ArmedTimer {
    period: Duration,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

#[derive(Default)]
pub struct Scheduler {
    slot: Mutex<Option<ArmedTimer>>,
    arms: AtomicU64,
}

impl Scheduler {
    /// Cancels the current timer and, for a non-negative interval, arms a new one.
    pub fn arm(&self, ctx: &Arc<BotContext>, interval: Interval) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = slot.take() {
            old.cancel.send_replace(true);
        }

        match interval {
            Interval::Every(period) => {
                let (cancel, rx) = watch::channel(false);
                let task = tokio::spawn(run_timer(Arc::downgrade(ctx), period, rx));
                *slot = Some(ArmedTimer {
                    period,
                    cancel,
                    task,
                });
                let armed = self.arms.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::info!("Scheduled scrape armed every {:?} (timer #{})", period, armed);
            }
            Interval::Disabled => {
                tracing::info!("Scheduled scrape disabled");
            }
        }
    }

    /// Cancels the current timer without arming a new one.
    pub fn disarm(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.take() {
            Some(timer) => {
                timer.cancel.send_replace(true);
                tracing::info!("Scheduled scrape every {:?} cancelled", timer.period);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().is_some_and(|t| !t.task.is_finished())
    }

    /// Period of the live timer, if any.
    #[cfg(test)]
    pub fn armed_period(&self) -> Option<Duration> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().filter(|t| !t.task.is_finished()).map(|t| t.period)
    }

    /// Number of timers armed since creation.
    #[cfg(test)]
    pub fn arm_count(&self) -> u64 {
        self.arms.load(Ordering::SeqCst)
    }
}

async fn run_timer(ctx: Weak<BotContext>, mut period: Duration, mut cancel: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = cancel.changed() => break,
        }
        if *cancel.borrow() {
            break;
        }
        let Some(ctx) = ctx.upgrade() else { break };
        if !ctx.run.is_running() {
            break;
        }

        tick(&ctx).await;

        let next = ctx.config.read().await.scrape_interval();
        match next {
            Interval::Every(next) => period = next,
            Interval::Disabled => break,
        }
    }
    tracing::debug!("Scrape timer exited");
}

async fn tick(ctx: &BotContext) {
    let chat_id = ctx.config.read().await.chat_id().to_string();
    ctx.notify(&chat_id, messages::SCHEDULED_SCRAPE).await;
    if let Err(e) = scrape::run_full_cycle(ctx, &chat_id).await {
        tracing::warn!("Scheduled scrape result not delivered: {}", e);
    }
}
