//! # Bot Controller
//!
//! Start-up and shutdown. `start` loads the three property groups, connects
//! the chat transport, arms the scheduler and spawns the dispatcher loop.
//! `stop` flips the running flag; whatever is already in flight finishes, but
//! no new command or tick starts afterwards.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::config_store::ConfigStore;
use crate::application::context::BotContext;
use crate::application::router::CommandRouter;
use crate::domain::errors::StartError;
use crate::domain::traits::{ChatConnector, ListingSource};
use crate::domain::types::InboundMessage;
use crate::strings::logs;

const INBOUND_BUFFER: usize = 64;

pub struct BotController {
    ctx: Arc<BotContext>,
    dispatcher: JoinHandle<()>,
}

/// Cloneable handle that schedules shutdown.
#[derive(Clone)]
pub struct StopHandle {
    ctx: Arc<BotContext>,
}

impl BotController {
    pub async fn start(
        config_dir: &Path,
        connector: &dyn ChatConnector,
        source: Arc<dyn ListingSource>,
    ) -> Result<Self, StartError> {
        tracing::info!("Initializing bot...");
        let config = ConfigStore::load(config_dir)?;
        let chat = connector.connect(config_dir).await?;

        let ctx = BotContext::new(config, chat, source);
        ctx.run.start();

        let interval = ctx.config.read().await.scrape_interval();
        ctx.scheduler.arm(&ctx, interval);

        let (tx, rx) = mpsc::channel(INBOUND_BUFFER);
        let dispatcher = tokio::spawn(dispatch_loop(ctx.clone(), rx));
        if let Err(e) = ctx.chat.listen(tx).await {
            ctx.run.stop();
            ctx.scheduler.disarm();
            return Err(e);
        }

        let name = ctx.config.read().await.bot_name().to_string();
        tracing::info!("{}", logs::listening(&name));
        Ok(Self { ctx, dispatcher })
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            ctx: self.ctx.clone(),
        }
    }

    #[cfg(test)]
    pub async fn stop(&self) {
        self.stop_handle().stop().await;
    }

    /// Waits for the dispatcher loop to exit after `stop`.
    pub async fn wait(self) {
        if let Err(e) = self.dispatcher.await {
            tracing::error!("Dispatcher task failed: {}", e);
        }
    }

    #[cfg(test)]
    pub fn context(&self) -> &Arc<BotContext> {
        &self.ctx
    }
}

impl StopHandle {
    /// Returns once the transport has been told to detach. Calling it again
    /// is a no-op.
    pub async fn stop(&self) {
        if !self.ctx.run.stop() {
            return;
        }
        self.ctx.scheduler.disarm();
        self.ctx.chat.detach().await;

        let name = self.ctx.config.read().await.bot_name().to_string();
        tracing::info!("{}", logs::stopped(&name));
    }
}

/// Consumes inbound messages one at a time. Each accepted message is handled on
/// its own task so a slow scrape does not hold up the stream.
async fn dispatch_loop(ctx: Arc<BotContext>, mut inbound: mpsc::Receiver<InboundMessage>) {
    let router = Arc::new(CommandRouter::new(ctx.clone()));

    loop {
        let message = tokio::select! {
            message = inbound.recv() => message,
            _ = ctx.run.stopped() => None,
        };
        let Some(message) = message else { break };
        if !ctx.run.is_running() {
            break;
        }

        let router = router.clone();
        tokio::spawn(async move {
            if let Err(e) = router.route(&message).await {
                tracing::warn!("Failed to route message: {}", e);
            }
        });
    }
    tracing::debug!("Dispatcher loop exited");
}
