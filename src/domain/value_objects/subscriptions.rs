use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::subscription_statuses::SubscriptionStatus;

/// Subscription as reported by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingSubscription {
    pub id: String,
    pub status: String,
    pub client_secret: Option<String>,
}

impl BillingSubscription {
    pub fn status(&self) -> SubscriptionStatus {
        SubscriptionStatus::from_str(&self.status)
    }
}

/// Verified webhook event. Only subscription lifecycle events carry a
/// subscription id and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingEvent {
    pub event_type: String,
    pub subscription_id: Option<String>,
    pub status: Option<String>,
}

pub const SUBSCRIPTION_CREATED: &str = "customer.subscription.created";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

impl BillingEvent {
    /// Status to store for the event's subscription, if the event affects one.
    pub fn resulting_status(&self) -> Option<(String, SubscriptionStatus)> {
        let subscription_id = self.subscription_id.clone()?;
        let status = match self.event_type.as_str() {
            SUBSCRIPTION_DELETED => SubscriptionStatus::Canceled,
            SUBSCRIPTION_CREATED | SUBSCRIPTION_UPDATED => {
                SubscriptionStatus::from_str(self.status.as_deref()?)
            }
            _ => return None,
        };
        Some((subscription_id, status))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSetupModel {
    pub subscription_id: String,
    pub client_secret: Option<String>,
}

impl From<BillingSubscription> for SubscriptionSetupModel {
    fn from(subscription: BillingSubscription) -> Self {
        Self {
            subscription_id: subscription.id,
            client_secret: subscription.client_secret,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookAckModel {
    pub received: bool,
}
