// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Pix instant-transfer codes: TLV payload, CRC16 trailer, QR rendering and
//! instruction issuance.

mod brcode;
mod crc;
mod error;
mod issue;
mod qr;
mod tlv;

pub use brcode::{
    build, decode, verify, DecodedCode, COUNTRY_CODE, CRC_MARKER, CURRENCY_BRL, GUI,
    MERCHANT_CATEGORY, PAYLOAD_FORMAT,
};
pub use crc::{checksum, checksum_hex, crc16_ccitt};
pub use error::PixError;
pub use issue::{generate_txid, issue, PixIssuer, DEFAULT_INSTRUCTION_TTL};
pub use qr::{render_qr_data_uri, QR_MIN_DIMENSION};
pub use tlv::{encode_field, parse_fields, Field, MAX_VALUE_CHARS};

pub const CRATE_NAME: &str = "doacao-pix";
