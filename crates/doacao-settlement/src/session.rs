// SPDX-License-Identifier: Apache-2.0

use crate::source::SettlementError;
use chrono::{DateTime, Utc};
use doacao_model::{PaymentStatus, SettlementStatus, TxId};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::{debug, warn};

/// Time left on an instruction, as shown to the donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining(Duration),
    Expired,
}

impl Display for Countdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remaining(left) => {
                let secs = left.as_secs();
                write!(
                    f,
                    "{:02}:{:02}:{:02}",
                    secs / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )
            }
            Self::Expired => f.write_str("Expirado"),
        }
    }
}

/// Permission to run one status call. Only the most recent generation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    generation: u64,
}

/// What applying a poll result did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEffect {
    /// Stale ticket or already terminal; nothing changed.
    Ignored,
    Unchanged,
    Settled,
    Expired,
}

/// Client-side lifecycle of one issued instruction. Pure state, no timers.
#[derive(Debug, Clone)]
pub struct SettlementSession {
    payment_id: TxId,
    expires_at: DateTime<Utc>,
    state: PaymentStatus,
    in_flight: bool,
    generation: u64,
}

impl SettlementSession {
    #[must_use]
    pub fn new(payment_id: TxId, expires_at: DateTime<Utc>) -> Self {
        Self {
            payment_id,
            expires_at,
            state: PaymentStatus::Pending,
            in_flight: false,
            generation: 0,
        }
    }

    #[must_use]
    pub fn payment_id(&self) -> &TxId {
        &self.payment_id
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn state(&self) -> PaymentStatus {
        self.state
    }

    #[must_use]
    pub fn poll_in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        if now >= self.expires_at {
            return Countdown::Expired;
        }
        (self.expires_at - now)
            .to_std()
            .map_or(Countdown::Expired, Countdown::Remaining)
    }

    /// Recomputes the countdown; reaching zero expires an active session.
    pub fn on_display_tick(&mut self, now: DateTime<Utc>) -> Countdown {
        let countdown = self.countdown(now);
        if countdown == Countdown::Expired && self.state == PaymentStatus::Pending {
            self.state = PaymentStatus::Expired;
            debug!(payment_id = %self.payment_id, "instruction expired by countdown");
        }
        countdown
    }

    /// `None` while a poll is in flight or once the session is terminal.
    pub fn begin_poll(&mut self) -> Option<PollTicket> {
        if self.state.is_terminal() || self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(PollTicket {
            generation: self.generation,
        })
    }

    pub fn complete_poll(
        &mut self,
        ticket: PollTicket,
        outcome: Result<SettlementStatus, SettlementError>,
    ) -> PollEffect {
        if ticket.generation != self.generation {
            return PollEffect::Ignored;
        }
        self.in_flight = false;
        if self.state.is_terminal() {
            return PollEffect::Ignored;
        }
        match outcome {
            Ok(SettlementStatus::Completed) => {
                self.state = PaymentStatus::Settled;
                PollEffect::Settled
            }
            Ok(SettlementStatus::Expired) => {
                self.state = PaymentStatus::Expired;
                PollEffect::Expired
            }
            Ok(SettlementStatus::Pending) => PollEffect::Unchanged,
            Err(err) => {
                warn!(payment_id = %self.payment_id, error = %err, "settlement status poll failed");
                PollEffect::Unchanged
            }
        }
    }

    /// Closes the flow. Any poll issued before this call is discarded.
    pub fn abandon(&mut self) -> bool {
        self.generation += 1;
        self.in_flight = false;
        if self.state.is_terminal() {
            return false;
        }
        self.state = PaymentStatus::Abandoned;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> (SettlementSession, DateTime<Utc>) {
        let created = Utc
            .with_ymd_and_hms(2024, 3, 10, 8, 0, 0)
            .single()
            .expect("time");
        let id = TxId::from_bytes([7; 16]);
        (
            SettlementSession::new(id, created + chrono::Duration::hours(24)),
            created,
        )
    }

    #[test]
    fn countdown_renders_clock_and_expiry() {
        let (s, created) = session();
        assert_eq!(s.countdown(created).to_string(), "24:00:00");
        assert_eq!(
            s.countdown(created + chrono::Duration::seconds(3661)).to_string(),
            "22:58:59"
        );
        let edge = created + chrono::Duration::hours(24);
        assert_eq!(
            s.countdown(edge - chrono::Duration::milliseconds(1)).to_string(),
            "00:00:00"
        );
        assert_eq!(s.countdown(edge).to_string(), "Expirado");
    }

    #[test]
    fn display_tick_expires_without_a_poll() {
        let (mut s, created) = session();
        s.on_display_tick(created + chrono::Duration::hours(23));
        assert_eq!(s.state(), PaymentStatus::Pending);
        s.on_display_tick(created + chrono::Duration::hours(24));
        assert_eq!(s.state(), PaymentStatus::Expired);
        assert!(s.begin_poll().is_none());
    }

    #[test]
    fn only_one_poll_in_flight() {
        let (mut s, _) = session();
        let ticket = s.begin_poll().expect("first poll");
        assert!(s.begin_poll().is_none());
        assert_eq!(
            s.complete_poll(ticket, Ok(SettlementStatus::Pending)),
            PollEffect::Unchanged
        );
        assert!(s.begin_poll().is_some());
    }

    #[test]
    fn errors_leave_state_unchanged() {
        let (mut s, _) = session();
        let ticket = s.begin_poll().expect("poll");
        let effect = s.complete_poll(ticket, Err(SettlementError::Status(502)));
        assert_eq!(effect, PollEffect::Unchanged);
        assert_eq!(s.state(), PaymentStatus::Pending);
        assert!(!s.poll_in_flight());
    }

    #[test]
    fn completed_and_expired_are_terminal() {
        let (mut s, _) = session();
        let t = s.begin_poll().expect("poll");
        assert_eq!(
            s.complete_poll(t, Ok(SettlementStatus::Completed)),
            PollEffect::Settled
        );
        assert_eq!(s.state(), PaymentStatus::Settled);
        assert!(s.begin_poll().is_none());
        assert!(!s.abandon());
        assert_eq!(s.state(), PaymentStatus::Settled);

        let (mut s, _) = session();
        let t = s.begin_poll().expect("poll");
        assert_eq!(
            s.complete_poll(t, Ok(SettlementStatus::Expired)),
            PollEffect::Expired
        );
        assert_eq!(s.state(), PaymentStatus::Expired);
    }

    #[test]
    fn late_result_after_abandon_is_ignored() {
        let (mut s, _) = session();
        let ticket = s.begin_poll().expect("poll");
        assert!(s.abandon());
        assert_eq!(
            s.complete_poll(ticket, Ok(SettlementStatus::Completed)),
            PollEffect::Ignored
        );
        assert_eq!(s.state(), PaymentStatus::Abandoned);
        assert!(s.begin_poll().is_none());
    }
}
