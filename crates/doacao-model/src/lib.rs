// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Campaign and payment domain types.

mod campaign;
mod catalog;
mod payment;
mod validation;

pub use campaign::{CampaignId, CampaignRecord, Slug, Testimonial, CAMPAIGN_ID_MAX_LEN, ROOT_SLUG};
pub use catalog::Catalog;
pub use payment::{
    Amount, Payee, PaymentInstruction, PaymentStatus, SettlementStatus, TxId, MAX_AMOUNT_CENTS,
    TXID_BYTES,
};
pub use validation::ValidationError;

pub const CRATE_NAME: &str = "doacao-model";
