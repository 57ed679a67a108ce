// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod effects;
mod errors;

use sha2::{Digest, Sha256};

pub use effects::{Clock, ManualClock, OsRandom, RandomSource, SeededRandom, SystemClock};
pub use errors::{Error, ErrorKind, ExitCode, MachineError, Result};

pub const CRATE_NAME: &str = "doacao-core";

pub const ENV_DOACAO_LOG_LEVEL: &str = "DOACAO_LOG_LEVEL";

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::sha256_hex;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
