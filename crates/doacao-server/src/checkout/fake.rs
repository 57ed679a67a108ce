// SPDX-License-Identifier: Apache-2.0

use super::{session_form, CheckoutError, CheckoutProvider, CheckoutSession};
use async_trait::async_trait;
use doacao_api::CheckoutOrder;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// In-process provider for tests: records every form it would have posted.
#[derive(Debug, Default)]
pub struct FakeCheckout {
    pub forms: Mutex<Vec<Vec<(String, String)>>>,
    pub fail_with: Mutex<Option<CheckoutError>>,
    pub calls: AtomicU64,
}

#[async_trait]
impl CheckoutProvider for FakeCheckout {
    fn provider_tag(&self) -> &'static str {
        "fake"
    }

    async fn create_session(
        &self,
        order: &CheckoutOrder,
        origin: &str,
    ) -> Result<CheckoutSession, CheckoutError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(err) = self.fail_with.lock().await.clone() {
            return Err(err);
        }
        self.forms.lock().await.push(session_form(order, origin));
        Ok(CheckoutSession {
            id: format!("cs_test_{n:04}"),
            url: format!("https://checkout.invalid/pay/cs_test_{n:04}"),
        })
    }
}
