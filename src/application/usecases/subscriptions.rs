use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        interfaces::billing::BillingGateway,
    },
    domain::{
        entities::users::{EditUserBillingEntity, UserEntity},
        repositories::users::UserRepository,
        value_objects::{
            subscriptions::{BillingSubscription, SubscriptionSetupModel},
            users::UserModel,
        },
    },
};

pub struct SubscriptionUseCase<U, B>
where
    U: UserRepository + Send + Sync + 'static,
    B: BillingGateway + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    billing: Option<Arc<B>>,
}

impl<U, B> SubscriptionUseCase<U, B>
where
    U: UserRepository + Send + Sync + 'static,
    B: BillingGateway + Send + Sync + 'static,
{
    /// `billing` is `None` when no payment provider is configured.
    pub fn new(user_repo: Arc<U>, billing: Option<Arc<B>>) -> Self {
        Self { user_repo, billing }
    }

    fn billing(&self) -> UseCaseResult<&Arc<B>> {
        self.billing.as_ref().ok_or_else(|| {
            warn!("subscriptions: billing provider is not configured");
            UseCaseError::PaymentUnavailable
        })
    }

    /// Returns the client secret for the caller's subscription, creating the
    /// customer and subscription at the provider only when none exist yet.
    /// Each provider id is stored as soon as it is known so a retry after a
    /// partial failure picks up where the previous attempt stopped.
    pub async fn get_or_create(&self, user_id: &str) -> UseCaseResult<SubscriptionSetupModel> {
        let billing = self.billing()?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("User"))?;

        if let Some(subscription_id) = user.stripe_subscription_id.as_deref() {
            let subscription = billing
                .retrieve_subscription(subscription_id)
                .await
                .map_err(|err| {
                    error!(%user_id, %subscription_id, error = ?err, "subscriptions: retrieve failed");
                    UseCaseError::Billing(err)
                })?;

            if subscription.status != user.subscription_status {
                self.store_billing(
                    user_id,
                    EditUserBillingEntity {
                        subscription_status: Some(subscription.status.clone()),
                        ..Default::default()
                    },
                )
                .await?;
            }

            info!(%user_id, %subscription_id, status = %subscription.status, "subscriptions: existing subscription returned");
            return Ok(SubscriptionSetupModel::from(subscription));
        }

        let email = user
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                warn!(%user_id, "subscriptions: no email on file");
                UseCaseError::Validation("No user email on file".to_string())
            })?;

        let customer_id = self.ensure_customer(billing, &user, &email).await?;

        let subscription = self.open_or_create_subscription(billing, user_id, &customer_id).await?;

        self.store_billing(
            user_id,
            EditUserBillingEntity {
                stripe_subscription_id: Some(subscription.id.clone()),
                subscription_status: Some(subscription.status.clone()),
                ..Default::default()
            },
        )
        .await?;

        info!(
            %user_id,
            subscription_id = %subscription.id,
            status = %subscription.status,
            "subscriptions: subscription ready for payment"
        );

        Ok(SubscriptionSetupModel::from(subscription))
    }

    async fn ensure_customer(
        &self,
        billing: &Arc<B>,
        user: &UserEntity,
        email: &str,
    ) -> UseCaseResult<String> {
        let user_id = user.id.as_str();

        if let Some(customer_id) = user.stripe_customer_id.clone() {
            debug!(%user_id, %customer_id, "subscriptions: reusing stored customer");
            return Ok(customer_id);
        }

        let name = UserModel::from(user.clone()).display_name();
        let customer_id = billing
            .create_customer(user_id, email, name)
            .await
            .map_err(|err| {
                error!(%user_id, error = ?err, "subscriptions: customer creation failed");
                UseCaseError::Billing(err)
            })?;

        self.store_billing(
            user_id,
            EditUserBillingEntity {
                stripe_customer_id: Some(customer_id.clone()),
                ..Default::default()
            },
        )
        .await?;

        info!(%user_id, %customer_id, "subscriptions: customer created");
        Ok(customer_id)
    }

    async fn open_or_create_subscription(
        &self,
        billing: &Arc<B>,
        user_id: &str,
        customer_id: &str,
    ) -> UseCaseResult<BillingSubscription> {
        let open = billing
            .find_open_subscription(customer_id)
            .await
            .map_err(|err| {
                error!(%user_id, %customer_id, error = ?err, "subscriptions: open subscription lookup failed");
                UseCaseError::Billing(err)
            })?;

        if let Some(subscription) = open {
            info!(%user_id, subscription_id = %subscription.id, "subscriptions: resuming open subscription");
            return Ok(subscription);
        }

        billing
            .create_subscription(user_id, customer_id)
            .await
            .map_err(|err| {
                error!(%user_id, %customer_id, error = ?err, "subscriptions: subscription creation failed");
                UseCaseError::Billing(err)
            })
    }

    async fn store_billing(
        &self,
        user_id: &str,
        mut edit_billing_entity: EditUserBillingEntity,
    ) -> UseCaseResult<()> {
        edit_billing_entity.updated_at = Utc::now();
        self.user_repo
            .update_billing(user_id, edit_billing_entity)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to store billing ids");
                UseCaseError::Internal(err)
            })?;
        Ok(())
    }

    /// Applies a signed provider event to the matching user.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> UseCaseResult<()> {
        let billing = self.billing()?;

        let Some(signature) = signature else {
            warn!("subscriptions: webhook without signature header");
            return Err(UseCaseError::Validation(
                "Missing stripe-signature header".to_string(),
            ));
        };

        let event = billing.verify_webhook(payload, signature).map_err(|err| {
            warn!(error = %err, "subscriptions: webhook rejected");
            UseCaseError::Validation(format!("Invalid webhook: {err}"))
        })?;

        let Some((subscription_id, status)) = event.resulting_status() else {
            debug!(event_type = %event.event_type, "subscriptions: webhook event ignored");
            return Ok(());
        };

        let updated = self
            .user_repo
            .update_status_by_subscription_id(&subscription_id, &status.to_string())
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to apply webhook");
                UseCaseError::Internal(err)
            })?;

        if updated == 0 {
            warn!(%subscription_id, event_type = %event.event_type, "subscriptions: webhook for unknown subscription");
        } else {
            info!(%subscription_id, %status, "subscriptions: status updated from webhook");
        }

        Ok(())
    }
}
