//! HTTP client for the payment-intent provider (Stripe-shaped API).

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::errors::AppError;

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

/// The subset of the provider's intent object this backend reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    /// Charged amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    pub client_secret: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: &str, api_base: &str) -> Self {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    /// Create a payment intent for `amount` minor units and hand the
    /// provider response back verbatim, client secret included.
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        method_types: &[&str],
    ) -> Result<PaymentIntent, AppError> {
        let mut form: Vec<(&str, String)> = vec![
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
        ];
        for method in method_types {
            form.push(("payment_method_types[]", (*method).to_string()));
        }

        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("payment intent request failed: {}", e);
                AppError::Upstream(e.to_string())
            })?;

        Self::read_intent(resp).await
    }

    /// Fetch an existing intent so settlement can confirm what was
    /// actually charged before touching the cart.
    pub async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, AppError> {
        let resp = self
            .client
            .get(format!("{}/v1/payment_intents/{}", self.api_base, id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("payment intent lookup failed: {}", e);
                AppError::Upstream(e.to_string())
            })?;

        Self::read_intent(resp).await
    }

    async fn read_intent(resp: reqwest::Response) -> Result<PaymentIntent, AppError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "payment provider rejected the request");
            return Err(AppError::Upstream(format!(
                "provider returned {status}: {body}"
            )));
        }

        resp.json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid provider response: {e}")))
    }
}
