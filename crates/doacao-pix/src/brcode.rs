// SPDX-License-Identifier: Apache-2.0

use crate::crc::checksum_hex;
use crate::error::PixError;
use crate::tlv::{encode_field, parse_fields, push_field, Field};
use doacao_model::{Amount, TxId};

pub const PAYLOAD_FORMAT: &str = "01";
pub const GUI: &str = "br.gov.bcb.pix";
pub const COUNTRY_CODE: &str = "BR";
pub const MERCHANT_CATEGORY: &str = "52040000";
pub const CURRENCY_BRL: &str = "986";
/// Tag and length of the checksum field, included in the checksummed text.
pub const CRC_MARKER: &str = "6304";

/// Builds the static-key instruction string with its trailing checksum.
pub fn build(
    payee_key: &str,
    description: &str,
    payee_name: &str,
    payee_city: &str,
    amount: Amount,
    txid: &TxId,
) -> Result<String, PixError> {
    let account = format!(
        "{}{}",
        encode_field("00", GUI)?,
        encode_field("01", payee_key)?
    );
    let additional = encode_field("05", description)?;

    let mut payload = String::with_capacity(160);
    push_field(&mut payload, "00", PAYLOAD_FORMAT)?;
    push_field(&mut payload, "26", &account)?;
    push_field(&mut payload, "59", payee_name)?;
    push_field(&mut payload, "60", payee_city)?;
    push_field(&mut payload, "54", &amount.to_string())?;
    push_field(&mut payload, "05", txid.as_str())?;
    push_field(&mut payload, "58", COUNTRY_CODE)?;
    push_field(&mut payload, "52", MERCHANT_CATEGORY)?;
    push_field(&mut payload, "53", CURRENCY_BRL)?;
    push_field(&mut payload, "62", &additional)?;
    payload.push_str(CRC_MARKER);

    let crc = checksum_hex(&payload);
    payload.push_str(&crc);
    Ok(payload)
}

/// True when the trailing four characters are the checksum of everything
/// before them and are preceded by the checksum marker.
#[must_use]
pub fn verify(code: &str) -> bool {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() < CRC_MARKER.len() + 4 {
        return false;
    }
    let split = chars.len() - 4;
    let body: String = chars[..split].iter().collect();
    let trailer: String = chars[split..].iter().collect();
    body.ends_with(CRC_MARKER) && checksum_hex(&body) == trailer
}

/// Decoded view of a code for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCode {
    pub fields: Vec<Field>,
    pub checksum_valid: bool,
}

impl DecodedCode {
    #[must_use]
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_str())
    }
}

pub fn decode(code: &str) -> Result<DecodedCode, PixError> {
    let fields = parse_fields(code)?;
    match fields.last() {
        Some(last) if last.tag == "63" && last.value.chars().count() == 4 => {}
        _ => {
            return Err(PixError::InvalidCode(
                "code does not end with a checksum field".to_string(),
            ))
        }
    }
    Ok(DecodedCode {
        fields,
        checksum_valid: verify(code),
    })
}
