// SPDX-License-Identifier: Apache-2.0

//! CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, MSB first, no reflection,
//! no final xor.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0_u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

#[must_use]
pub fn crc16_ccitt<I>(units: I) -> u16
where
    I: IntoIterator<Item = u8>,
{
    units.into_iter().fold(INIT, |crc, unit| {
        let idx = ((crc >> 8) as u8 ^ unit) as usize;
        (crc << 8) ^ TABLE[idx]
    })
}

/// Checksum of a payment-code string. Each character contributes one unit,
/// the low byte of its code point.
#[must_use]
pub fn checksum(text: &str) -> u16 {
    crc16_ccitt(text.chars().map(|c| (u32::from(c) & 0xFF) as u8))
}

#[must_use]
pub fn checksum_hex(text: &str) -> String {
    format!("{:04X}", checksum(text))
}
