// SPDX-License-Identifier: Apache-2.0

use crate::session::{Countdown, PollEffect, SettlementSession};
use crate::source::StatusSource;
use chrono::{DateTime, Utc};
use doacao_core::Clock;
use doacao_model::{PaymentStatus, TxId};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_DISPLAY_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const EVENT_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub display_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            display_interval: DEFAULT_DISPLAY_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Display refresh. Dropped when the consumer lags.
    Tick(Countdown),
    Settled,
    Expired,
    PollFailed(String),
}

/// Drives one [`SettlementSession`] with a display timer and a poll timer.
#[derive(Clone)]
pub struct SettlementWatcher {
    source: Arc<dyn StatusSource>,
    clock: Arc<dyn Clock>,
    config: WatchConfig,
}

struct Shared {
    session: Mutex<SettlementSession>,
    stop: Notify,
    events: mpsc::Sender<WatchEvent>,
}

impl SettlementWatcher {
    #[must_use]
    pub fn new(source: Arc<dyn StatusSource>, clock: Arc<dyn Clock>, config: WatchConfig) -> Self {
        Self {
            source,
            clock,
            config,
        }
    }

    /// Starts watching `payment_id` until it settles, expires or is abandoned.
    #[must_use]
    pub fn watch(
        &self,
        payment_id: TxId,
        expires_at: DateTime<Utc>,
    ) -> (WatchHandle, mpsc::Receiver<WatchEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let shared = Arc::new(Shared {
            session: Mutex::new(SettlementSession::new(payment_id, expires_at)),
            stop: Notify::new(),
            events: tx,
        });
        let driver = tokio::spawn(drive(
            Arc::clone(&shared),
            Arc::clone(&self.source),
            self.clock.now(),
            self.config,
        ));
        (
            WatchHandle {
                shared,
                driver: std::sync::Mutex::new(Some(driver)),
            },
            rx,
        )
    }
}

impl std::fmt::Debug for SettlementWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementWatcher")
            .field("source", &self.source.source_tag())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub struct WatchHandle {
    shared: Arc<Shared>,
    driver: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl WatchHandle {
    pub async fn status(&self) -> PaymentStatus {
        self.shared.session.lock().await.state()
    }

    /// Stops both timers and waits for the driver to exit. Poll results that
    /// arrive afterwards are discarded.
    pub async fn abandon(&self) -> bool {
        let changed = self.shared.session.lock().await.abandon();
        let driver = self
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(driver) = driver {
            driver.abort();
            let _ = driver.await;
        }
        changed
    }

    /// Waits for the driver to reach a terminal state on its own.
    pub async fn finished(&self) -> PaymentStatus {
        let driver = self
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(driver) = driver {
            let _ = driver.await;
        }
        self.status().await
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        let driver = self
            .driver
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(driver) = driver {
            driver.abort();
        }
    }
}

async fn drive(
    shared: Arc<Shared>,
    source: Arc<dyn StatusSource>,
    start_wall: DateTime<Utc>,
    config: WatchConfig,
) {
    let start = Instant::now();
    let mut display = interval(config.display_interval);
    display.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut poll = interval_at(start + config.poll_interval, config.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = shared.stop.notified() => {
                let state = shared.session.lock().await.state();
                announce_terminal(&shared, state).await;
                break;
            }
            _ = display.tick() => {
                let now = start_wall
                    + chrono::Duration::from_std(start.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
                let (countdown, state) = {
                    let mut session = shared.session.lock().await;
                    (session.on_display_tick(now), session.state())
                };
                if state == PaymentStatus::Pending {
                    let _ = shared.events.try_send(WatchEvent::Tick(countdown));
                } else {
                    announce_terminal(&shared, state).await;
                    break;
                }
            }
            _ = poll.tick() => {
                let ticket = shared.session.lock().await.begin_poll();
                let Some(ticket) = ticket else {
                    debug!("status poll suppressed");
                    continue;
                };
                let shared = Arc::clone(&shared);
                let source = Arc::clone(&source);
                tokio::spawn(async move {
                    let payment_id = shared.session.lock().await.payment_id().clone();
                    let outcome = source.fetch_status(&payment_id).await;
                    let failure = outcome.as_ref().err().map(ToString::to_string);
                    let effect = shared.session.lock().await.complete_poll(ticket, outcome);
                    match effect {
                        PollEffect::Settled => {
                            info!(payment_id = %payment_id, "payment settled");
                            shared.stop.notify_one();
                        }
                        PollEffect::Expired => {
                            info!(payment_id = %payment_id, "payment expired upstream");
                            shared.stop.notify_one();
                        }
                        PollEffect::Unchanged => {
                            if let Some(msg) = failure {
                                let _ = shared.events.try_send(WatchEvent::PollFailed(msg));
                            }
                        }
                        PollEffect::Ignored => {}
                    }
                });
            }
        }
    }
}

/// Sends the single terminal event for `state`. Abandoned sessions emit none.
async fn announce_terminal(shared: &Shared, state: PaymentStatus) {
    let event = match state {
        PaymentStatus::Settled => WatchEvent::Settled,
        PaymentStatus::Expired => WatchEvent::Expired,
        PaymentStatus::Pending | PaymentStatus::Abandoned => return,
    };
    let _ = shared.events.send(event).await;
}
