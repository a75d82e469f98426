use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::subscriptions::{BillingEvent, BillingSubscription};

#[automock]
#[async_trait]
pub trait BillingGateway {
    async fn create_customer(
        &self,
        user_id: &str,
        email: &str,
        name: Option<String>,
    ) -> Result<String>;
    /// Creates an incomplete subscription whose first invoice awaits payment.
    async fn create_subscription(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> Result<BillingSubscription>;
    async fn retrieve_subscription(&self, subscription_id: &str) -> Result<BillingSubscription>;
    /// Latest subscription for the customer that still awaits its first payment.
    async fn find_open_subscription(&self, customer_id: &str)
    -> Result<Option<BillingSubscription>>;
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<BillingEvent>;
}
