// SPDX-License-Identifier: Apache-2.0

use doacao_core::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    /// A TLV value longer than the two-digit length prefix can express.
    FieldTooLong { tag: String, len: usize },
    InvalidCode(String),
    Render(String),
}

impl Display for PixError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldTooLong { tag, len } => {
                write!(f, "field {tag} is {len} characters long, maximum is 99")
            }
            Self::InvalidCode(msg) => write!(f, "invalid payment code: {msg}"),
            Self::Render(msg) => write!(f, "qr rendering failed: {msg}"),
        }
    }
}

impl std::error::Error for PixError {}

impl From<PixError> for Error {
    fn from(value: PixError) -> Self {
        match &value {
            PixError::FieldTooLong { tag, .. } => {
                Error::validation(value.to_string()).with_detail("tag", tag.as_str())
            }
            PixError::InvalidCode(_) => Error::validation(value.to_string()),
            PixError::Render(_) => Error::internal(value.to_string()),
        }
    }
}
