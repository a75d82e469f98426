use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, error};

use crate::{
    application::interfaces::billing::BillingGateway,
    config::config_model::Stripe,
    domain::value_objects::subscriptions::{BillingEvent, BillingSubscription},
};

type HmacSha256 = Hmac<Sha256>;

/// Signed webhook timestamps older than this are rejected.
const WEBHOOK_TOLERANCE_SECS: i64 = 300;
const OPEN_SUBSCRIPTION_STATUS: &str = "incomplete";
const SUBSCRIPTION_EVENT_PREFIX: &str = "customer.subscription.";

/// Minimal Stripe client built on reqwest.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    price_id: String,
    webhook_secret: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    type_: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    id: String,
    status: String,
    latest_invoice: Option<StripeInvoiceRef>,
}

/// `latest_invoice` is an id unless expanded.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StripeInvoiceRef {
    Expanded(StripeInvoice),
    Id(String),
}

#[derive(Debug, Deserialize)]
struct StripeInvoice {
    payment_intent: Option<StripePaymentIntentRef>,
    confirmation_secret: Option<StripeClientSecret>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StripePaymentIntentRef {
    Expanded(StripeClientSecret),
    Id(String),
}

#[derive(Debug, Deserialize)]
struct StripeClientSecret {
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

impl StripeSubscription {
    fn client_secret(&self) -> Option<String> {
        let StripeInvoiceRef::Expanded(invoice) = self.latest_invoice.as_ref()? else {
            return None;
        };
        let from_intent = match invoice.payment_intent.as_ref() {
            Some(StripePaymentIntentRef::Expanded(intent)) => intent.client_secret.clone(),
            _ => None,
        };
        from_intent.or_else(|| {
            invoice
                .confirmation_secret
                .as_ref()
                .and_then(|secret| secret.client_secret.clone())
        })
    }

    fn into_billing(self) -> BillingSubscription {
        BillingSubscription {
            client_secret: self.client_secret(),
            id: self.id,
            status: self.status,
        }
    }
}

impl StripeClient {
    pub fn new(
        secret_key: String,
        price_id: String,
        webhook_secret: String,
        base_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            price_id,
            webhook_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Stripe) -> Self {
        Self::new(
            config.secret_key.clone(),
            config.price_id.clone(),
            config.webhook_secret.clone(),
            config.base_url.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .or_else(|| resp.headers().get("stripe-request-id"))
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?details.as_ref().and_then(|d| d.type_.clone()),
            stripe_error_code = ?details.as_ref().and_then(|d| d.code.clone()),
            stripe_error_param = ?details.as_ref().and_then(|d| d.param.clone()),
            stripe_decline_code = ?details.as_ref().and_then(|d| d.decline_code.clone()),
            response_body = %body,
            context = %context,
            "stripe: api request failed"
        );

        let message = details
            .and_then(|d| d.message)
            .unwrap_or_else(|| format!("status {status}"));

        anyhow::bail!(
            "Stripe API request failed: {} ({}, request_id={:?})",
            context,
            message,
            request_id
        );
    }

    async fn post_form(
        &self,
        path: &str,
        body: &[(&str, String)],
        idempotency_key: &str,
        context: &str,
    ) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("Idempotency-Key", idempotency_key)
            .form(body)
            .send()
            .await
            .with_context(|| format!("Stripe request failed: {context}"))?;
        Self::ensure_success(resp, context).await
    }

    /// Verifies the `Stripe-Signature` header. https://stripe.com/docs/webhooks/signatures
    fn verify_signature(&self, payload: &[u8], signature_header: &str, now: i64) -> Result<()> {
        let mut timestamp: Option<&str> = None;
        let mut signatures = Vec::new();

        for part in signature_header.split(',') {
            let part = part.trim();
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest);
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signatures.push(rest);
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        if signatures.is_empty() {
            anyhow::bail!("missing v1 in stripe-signature");
        }

        let signed_at: i64 = timestamp
            .parse()
            .context("invalid timestamp in stripe-signature")?;
        if (now - signed_at).abs() > WEBHOOK_TOLERANCE_SECS {
            anyhow::bail!("webhook timestamp outside tolerance");
        }

        let mut signed_payload = format!("{timestamp}.").into_bytes();
        signed_payload.extend_from_slice(payload);

        let verified = signatures.into_iter().any(|signature| {
            let Ok(provided) = hex::decode(signature) else {
                return false;
            };
            let Ok(mut mac) = HmacSha256::new_from_slice(self.webhook_secret.as_bytes()) else {
                return false;
            };
            mac.update(&signed_payload);
            mac.verify_slice(&provided).is_ok()
        });

        if !verified {
            anyhow::bail!("invalid webhook signature");
        }
        Ok(())
    }
}

#[async_trait]
impl BillingGateway for StripeClient {
    async fn create_customer(
        &self,
        user_id: &str,
        email: &str,
        name: Option<String>,
    ) -> Result<String> {
        // https://stripe.com/docs/api/customers/create
        let mut body = vec![
            ("email", email.to_string()),
            ("metadata[user_id]", user_id.to_string()),
        ];
        if let Some(name) = name {
            body.push(("name", name));
        }

        let resp = self
            .post_form(
                "customers",
                &body,
                &format!("customer-{user_id}"),
                "create customer",
            )
            .await?;

        #[derive(Deserialize)]
        struct CustomerResp {
            id: String,
        }

        let parsed: CustomerResp = resp.json().await?;
        Ok(parsed.id)
    }

    async fn create_subscription(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> Result<BillingSubscription> {
        // https://stripe.com/docs/billing/subscriptions/build-subscriptions
        let body = [
            ("customer", customer_id.to_string()),
            ("items[0][price]", self.price_id.clone()),
            ("payment_behavior", "default_incomplete".to_string()),
            ("expand[]", "latest_invoice.payment_intent".to_string()),
            ("metadata[user_id]", user_id.to_string()),
        ];

        let resp = self
            .post_form(
                "subscriptions",
                &body,
                &format!("subscription-{user_id}"),
                "create subscription",
            )
            .await?;

        let subscription: StripeSubscription = resp.json().await?;
        debug!(subscription_id = %subscription.id, status = %subscription.status, "stripe: subscription created");
        Ok(subscription.into_billing())
    }

    async fn retrieve_subscription(&self, subscription_id: &str) -> Result<BillingSubscription> {
        // https://stripe.com/docs/api/subscriptions/retrieve
        let resp = self
            .http
            .get(self.url(&format!("subscriptions/{subscription_id}")))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .query(&[("expand[]", "latest_invoice.payment_intent")])
            .send()
            .await
            .context("Stripe request failed: retrieve subscription")?;
        let resp = Self::ensure_success(resp, "retrieve subscription").await?;

        let subscription: StripeSubscription = resp.json().await?;
        Ok(subscription.into_billing())
    }

    async fn find_open_subscription(
        &self,
        customer_id: &str,
    ) -> Result<Option<BillingSubscription>> {
        // https://stripe.com/docs/api/subscriptions/list
        let resp = self
            .http
            .get(self.url("subscriptions"))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .query(&[
                ("customer", customer_id),
                ("status", OPEN_SUBSCRIPTION_STATUS),
                ("limit", "1"),
                ("expand[]", "data.latest_invoice.payment_intent"),
            ])
            .send()
            .await
            .context("Stripe request failed: list subscriptions")?;
        let resp = Self::ensure_success(resp, "list subscriptions").await?;

        let list: StripeList<StripeSubscription> = resp.json().await?;
        Ok(list
            .data
            .into_iter()
            .next()
            .map(StripeSubscription::into_billing))
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<BillingEvent> {
        self.verify_signature(payload, signature, Utc::now().timestamp())?;

        let event: StripeEvent =
            serde_json::from_slice(payload).context("invalid webhook payload")?;

        let (subscription_id, status) = if event.type_.starts_with(SUBSCRIPTION_EVENT_PREFIX) {
            let object = &event.data.object;
            (
                object.get("id").and_then(|v| v.as_str()).map(str::to_string),
                object
                    .get("status")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            )
        } else {
            (None, None)
        };

        Ok(BillingEvent {
            event_type: event.type_,
            subscription_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;

    const WEBHOOK_SECRET: &str = "whsec_test";

    fn client(server: &MockServer) -> StripeClient {
        StripeClient::new(
            "sk_test_123".to_string(),
            "price_123".to_string(),
            WEBHOOK_SECRET.to_string(),
            server.base_url(),
        )
    }

    fn sign(payload: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.{payload}").as_bytes());
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[tokio::test]
    async fn create_subscription_sends_incomplete_behavior_and_idempotency_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/subscriptions")
                    .header("authorization", "Bearer sk_test_123")
                    .header("idempotency-key", "subscription-user-1")
                    .body_contains("payment_behavior=default_incomplete")
                    .body_contains("customer=cus_1");
                then.status(200).json_body(json!({
                    "id": "sub_1",
                    "status": "incomplete",
                    "latest_invoice": {
                        "id": "in_1",
                        "payment_intent": { "id": "pi_1", "client_secret": "pi_1_secret" }
                    }
                }));
            })
            .await;

        let subscription = client(&server)
            .create_subscription("user-1", "cus_1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(subscription.id, "sub_1");
        assert_eq!(subscription.status, "incomplete");
        assert_eq!(subscription.client_secret.as_deref(), Some("pi_1_secret"));
    }

    #[tokio::test]
    async fn retrieve_tolerates_unexpanded_invoice() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/subscriptions/sub_1");
                then.status(200).json_body(json!({
                    "id": "sub_1",
                    "status": "active",
                    "latest_invoice": "in_1"
                }));
            })
            .await;

        let subscription = client(&server).retrieve_subscription("sub_1").await.unwrap();

        assert_eq!(subscription.status, "active");
        assert_eq!(subscription.client_secret, None);
    }

    #[tokio::test]
    async fn find_open_subscription_filters_by_customer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/subscriptions")
                    .query_param("customer", "cus_1")
                    .query_param("status", "incomplete");
                then.status(200).json_body(json!({
                    "object": "list",
                    "data": [{
                        "id": "sub_open",
                        "status": "incomplete",
                        "latest_invoice": {
                            "confirmation_secret": { "client_secret": "in_secret" }
                        }
                    }]
                }));
            })
            .await;

        let open = client(&server).find_open_subscription("cus_1").await.unwrap();

        mock.assert_async().await;
        let open = open.unwrap();
        assert_eq!(open.id, "sub_open");
        assert_eq!(open.client_secret.as_deref(), Some("in_secret"));
    }

    #[tokio::test]
    async fn api_errors_carry_the_stripe_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/customers");
                then.status(402).json_body(json!({
                    "error": { "type": "card_error", "message": "Your card was declined." }
                }));
            })
            .await;

        let err = client(&server)
            .create_customer("user-1", "a@b.co", None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Your card was declined."));
    }

    #[test]
    fn verifies_signed_subscription_event() {
        let server_less = StripeClient::new(
            "sk".to_string(),
            "price".to_string(),
            WEBHOOK_SECRET.to_string(),
            "http://localhost".to_string(),
        );
        let payload = json!({
            "id": "evt_1",
            "type": "customer.subscription.updated",
            "data": { "object": { "id": "sub_1", "status": "active" } }
        })
        .to_string();
        let header = sign(&payload, Utc::now().timestamp());

        let event = server_less
            .verify_webhook(payload.as_bytes(), &header)
            .unwrap();

        assert_eq!(event.event_type, "customer.subscription.updated");
        assert_eq!(event.subscription_id.as_deref(), Some("sub_1"));
        assert_eq!(event.status.as_deref(), Some("active"));
    }

    #[test]
    fn rejects_tampered_or_stale_signatures() {
        let stripe = StripeClient::new(
            "sk".to_string(),
            "price".to_string(),
            WEBHOOK_SECRET.to_string(),
            "http://localhost".to_string(),
        );
        let payload = r#"{"type":"invoice.paid","data":{"object":{}}}"#;
        let now = Utc::now().timestamp();

        let tampered = sign(r#"{"type":"other"}"#, now);
        assert!(stripe.verify_webhook(payload.as_bytes(), &tampered).is_err());

        let stale = sign(payload, now - WEBHOOK_TOLERANCE_SECS - 60);
        assert!(stripe.verify_webhook(payload.as_bytes(), &stale).is_err());

        assert!(stripe.verify_webhook(payload.as_bytes(), "v1=abcd").is_err());
    }
}
