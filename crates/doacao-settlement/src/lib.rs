// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Settlement tracking for issued instructions: a pure session state
//! machine, the status source seam and a tokio driver with two timers.

mod session;
mod source;
mod watcher;

pub use session::{Countdown, PollEffect, PollTicket, SettlementSession};
pub use source::{HttpStatusSource, SettlementError, StatusSource};
pub use watcher::{
    SettlementWatcher, WatchConfig, WatchEvent, WatchHandle, DEFAULT_DISPLAY_INTERVAL,
    DEFAULT_POLL_INTERVAL,
};

pub const CRATE_NAME: &str = "doacao-settlement";
