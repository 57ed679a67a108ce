// SPDX-License-Identifier: Apache-2.0

use crate::brcode::build;
use crate::error::PixError;
use doacao_core::{Clock, RandomSource};
use doacao_model::{Amount, Payee, PaymentInstruction, TxId, TXID_BYTES};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_INSTRUCTION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[must_use]
pub fn generate_txid(random: &dyn RandomSource) -> TxId {
    let mut bytes = [0_u8; TXID_BYTES];
    random.fill_bytes(&mut bytes);
    TxId::from_bytes(bytes)
}

/// Creates a fresh instruction: new txid, checksummed code, expiry `ttl` after now.
pub fn issue(
    payee: &Payee,
    description: &str,
    amount: Amount,
    ttl: Duration,
    clock: &dyn Clock,
    random: &dyn RandomSource,
) -> Result<PaymentInstruction, PixError> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| PixError::InvalidCode(format!("instruction ttl out of range: {e}")))?;
    let txid = generate_txid(random);
    let code = build(
        &payee.key,
        description,
        &payee.name,
        &payee.city,
        amount,
        &txid,
    )?;
    let created_at = clock.now();
    let instruction = PaymentInstruction::new(
        txid,
        amount,
        payee.clone(),
        description.to_string(),
        code,
        created_at,
        created_at + ttl,
    );
    info!(
        payment_id = %instruction.payment_id,
        amount = %instruction.amount,
        expires_at = %instruction.expires_at,
        "pix instruction issued"
    );
    Ok(instruction)
}

/// Issues instructions for one configured payee.
#[derive(Clone)]
pub struct PixIssuer {
    payee: Payee,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl PixIssuer {
    #[must_use]
    pub fn new(
        payee: Payee,
        ttl: Duration,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            payee,
            ttl,
            clock,
            random,
        }
    }

    #[must_use]
    pub fn payee(&self) -> &Payee {
        &self.payee
    }

    pub fn issue(&self, amount: Amount, description: &str) -> Result<PaymentInstruction, PixError> {
        issue(
            &self.payee,
            description,
            amount,
            self.ttl,
            self.clock.as_ref(),
            self.random.as_ref(),
        )
    }
}

impl std::fmt::Debug for PixIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixIssuer")
            .field("payee", &self.payee)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
