// SPDX-License-Identifier: Apache-2.0

use crate::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Upper bound for a single donation: R$ 999.999.999,99.
pub const MAX_AMOUNT_CENTS: u64 = 99_999_999_999;
pub const TXID_BYTES: usize = 16;

/// Positive monetary amount with two-decimal precision, held as cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: u64,
}

impl Amount {
    pub fn from_cents(cents: u64) -> Result<Self, ValidationError> {
        if cents == 0 {
            return Err(ValidationError("amount must be positive".to_string()));
        }
        if cents > MAX_AMOUNT_CENTS {
            return Err(ValidationError(format!(
                "amount exceeds maximum of {MAX_AMOUNT_CENTS} cents"
            )));
        }
        Ok(Self { cents })
    }

    /// Rounds half away from zero to whole cents.
    pub fn from_decimal(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError("amount must be a finite number".to_string()));
        }
        let cents = (value * 100.0).round();
        if cents <= 0.0 {
            return Err(ValidationError("amount must be positive".to_string()));
        }
        if cents > MAX_AMOUNT_CENTS as f64 {
            return Err(ValidationError(format!(
                "amount exceeds maximum of {MAX_AMOUNT_CENTS} cents"
            )));
        }
        Self::from_cents(cents as u64)
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        let value = s
            .parse::<f64>()
            .map_err(|_| ValidationError(format!("amount `{s}` is not a number")))?;
        Self::from_decimal(value)
    }

    #[must_use]
    pub const fn cents(self) -> u64 {
        self.cents
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Self::from_decimal(v),
            Raw::Text(s) => Self::parse(&s),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Transaction id: 16 random bytes as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId(String);

impl TxId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; TXID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.len() != TXID_BYTES * 2 {
            return Err(ValidationError(format!(
                "transaction id must be {} hex characters",
                TXID_BYTES * 2
            )));
        }
        if !s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
            return Err(ValidationError(
                "transaction id must be lowercase hex".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TxId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxId> for String {
    fn from(value: TxId) -> Self {
        value.0
    }
}

impl Display for TxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receiving side of an instant-transfer code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Payee {
    pub key: String,
    pub name: String,
    pub city: String,
}

impl Payee {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            city: city.into(),
        }
    }
}

/// Local lifecycle of an issued instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Settled,
    Expired,
    Abandoned,
}

impl PaymentStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Status vocabulary of the settlement status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Completed,
    Expired,
}

impl SettlementStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    pub payment_id: TxId,
    pub amount: Amount,
    pub payee: Payee,
    pub description: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    status: PaymentStatus,
}

impl PaymentInstruction {
    #[must_use]
    pub fn new(
        payment_id: TxId,
        amount: Amount,
        payee: Payee,
        description: String,
        code: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            payment_id,
            amount,
            payee,
            description,
            code,
            created_at,
            expires_at,
            status: PaymentStatus::Pending,
        }
    }

    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        self.status
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Moves a pending instruction to `next`. Terminal statuses never change;
    /// returns whether a transition happened.
    pub fn transition(&mut self, next: PaymentStatus) -> bool {
        if self.status.is_terminal() || next == PaymentStatus::Pending {
            return false;
        }
        self.status = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_renders_two_decimals() {
        assert_eq!(Amount::parse("25").expect("amount").to_string(), "25.00");
        assert_eq!(Amount::parse(" 25.5 ").expect("amount").to_string(), "25.50");
        assert_eq!(Amount::from_decimal(1234.567).expect("amount").to_string(), "1234.57");
        assert_eq!(Amount::from_cents(5).expect("amount").to_string(), "0.05");
    }

    #[test]
    fn amount_rejects_non_positive_and_garbage() {
        assert!(Amount::parse("0").is_err());
        assert!(Amount::parse("-3").is_err());
        assert!(Amount::parse("abc").is_err());
        assert!(Amount::parse("NaN").is_err());
        assert!(Amount::from_decimal(0.004).is_err());
        assert!(Amount::from_cents(MAX_AMOUNT_CENTS + 1).is_err());
    }

    #[test]
    fn txid_from_bytes_is_lowercase_hex() {
        let id = TxId::from_bytes([0xAB; TXID_BYTES]);
        assert_eq!(id.as_str(), "ab".repeat(TXID_BYTES));
        assert!(TxId::parse(id.as_str()).is_ok());
        assert!(TxId::parse("ABCDEF0123456789ABCDEF0123456789").is_err());
        assert!(TxId::parse("abc").is_err());
    }

    #[test]
    fn terminal_status_never_changes() {
        let mut instruction = PaymentInstruction::new(
            TxId::from_bytes([1; TXID_BYTES]),
            Amount::from_cents(100).expect("amount"),
            Payee::new("k", "n", "c"),
            "d".to_string(),
            "code".to_string(),
            Utc::now(),
            Utc::now(),
        );
        assert!(instruction.transition(PaymentStatus::Settled));
        assert!(!instruction.transition(PaymentStatus::Expired));
        assert_eq!(instruction.status(), PaymentStatus::Settled);
    }
}
