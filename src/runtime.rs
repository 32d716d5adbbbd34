//! Wires the store, rotation scheduler and refresh cadence together.

use crate::config::AppSettings;
use crate::error::Result;
use crate::refresh::{DisplaySink, RefreshCadence};
use crate::rotation::QuoteRotationScheduler;
use crate::store::{ConfigStore, QuotePool, StorePaths};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Running countdown appliance core.
///
/// Both background loops share one cancellation token; the store handle is
/// exposed so the settings operation and manual rotation can write through it.
pub struct ClockRuntime {
    store: Arc<ConfigStore>,
    pool: QuotePool,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl ClockRuntime {
    /// Open the store, load the quote pool and spawn both loops.
    ///
    /// Opening may write default files, so it runs on the blocking pool.
    ///
    /// # Errors
    /// [`ClockError::Io`](crate::ClockError::Io) if the blocking open task
    /// panicked or was cancelled. Missing or unwritable files are not errors.
    pub async fn start<S: DisplaySink + Sync>(settings: &AppSettings, sink: S) -> Result<Self> {
        let paths = StorePaths::from_settings(settings);
        let (store, pool) = tokio::task::spawn_blocking(move || {
            let store = Arc::new(ConfigStore::open(paths));
            let pool = store.load_quote_pool();
            (store, pool)
        })
        .await
        .map_err(std::io::Error::from)?;
        let cancel = CancellationToken::new();

        let scheduler = QuoteRotationScheduler::new(
            Arc::clone(&store),
            pool.clone(),
            settings.trigger,
            cancel.child_token(),
        )
        .with_poll_interval(settings.rotation_poll_interval());

        let cadence = RefreshCadence::new(Arc::clone(&store), sink, cancel.child_token())
            .with_period(settings.refresh_period());

        let tasks = vec![tokio::spawn(scheduler.run()), tokio::spawn(cadence.run())];

        info!(
            config = %store.paths().config.display(),
            quotes = pool.len(),
            trigger = %settings.trigger,
            "countdown runtime started"
        );

        Ok(Self {
            store,
            pool,
            cancel,
            tasks,
        })
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Quote pool loaded at startup.
    pub fn pool(&self) -> &QuotePool {
        &self.pool
    }

    /// Token that stops both loops when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel both loops and wait for them to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("background task ended abnormally: {e}");
            }
        }
        info!("countdown runtime stopped");
    }
}
