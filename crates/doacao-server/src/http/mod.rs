// SPDX-License-Identifier: Apache-2.0

pub(crate) mod campaigns;
pub(crate) mod health;
pub(crate) mod payments;
pub(crate) mod request_tracing;
pub(crate) mod response_contract;
