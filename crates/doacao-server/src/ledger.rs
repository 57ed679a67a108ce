// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use doacao_model::{PaymentInstruction, PaymentStatus, TxId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory record of issued instructions, consulted by the status endpoint.
#[derive(Debug)]
pub struct PaymentLedger {
    entries: Mutex<HashMap<TxId, PaymentInstruction>>,
    grace: chrono::Duration,
}

impl PaymentLedger {
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            grace: chrono::Duration::from_std(grace).unwrap_or(chrono::Duration::hours(1)),
        }
    }

    pub async fn record(&self, instruction: PaymentInstruction, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().await;
        let grace = self.grace;
        entries.retain(|_, entry| entry.expires_at + grace > now);
        entries.insert(instruction.payment_id.clone(), instruction);
    }

    /// Status as of `now`: a pending entry past its expiry becomes `Expired`.
    pub async fn status(&self, payment_id: &TxId, now: DateTime<Utc>) -> Option<PaymentStatus> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(payment_id)?;
        if entry.is_expired_at(now) {
            entry.transition(PaymentStatus::Expired);
        }
        Some(entry.status())
    }

    /// Records a terminal answer from upstream. Returns false when the entry
    /// is unknown or already terminal.
    pub async fn transition(&self, payment_id: &TxId, next: PaymentStatus) -> bool {
        self.entries
            .lock()
            .await
            .get_mut(payment_id)
            .is_some_and(|entry| entry.transition(next))
    }

    /// Drops entries expired for longer than the grace period.
    pub async fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let grace = self.grace;
        entries.retain(|_, entry| entry.expires_at + grace > now);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "ledger pruned");
        }
        removed
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
