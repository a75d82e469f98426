use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use tracing::info;

use crate::{
    application::{interfaces::billing::BillingGateway, usecases::subscriptions::SubscriptionUseCase},
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            iam::AuthUser,
            subscriptions::{SubscriptionSetupModel, WebhookAckModel},
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

const SIGNATURE_HEADER: &str = "stripe-signature";

fn usecase<B>(
    db_pool: Arc<PgPoolSquad>,
    billing: Option<Arc<B>>,
) -> Arc<SubscriptionUseCase<UserPostgres, B>>
where
    B: BillingGateway + Send + Sync + 'static,
{
    let user_repository = UserPostgres::new(db_pool);
    Arc::new(SubscriptionUseCase::new(Arc::new(user_repository), billing))
}

/// Session-guarded subscription setup.
pub fn routes<B>(db_pool: Arc<PgPoolSquad>, billing: Option<Arc<B>>) -> Router
where
    B: BillingGateway + Send + Sync + 'static,
{
    router(usecase(db_pool, billing))
}

/// Provider callbacks, authenticated by signature instead of session.
pub fn webhook_routes<B>(db_pool: Arc<PgPoolSquad>, billing: Option<Arc<B>>) -> Router
where
    B: BillingGateway + Send + Sync + 'static,
{
    webhook_router(usecase(db_pool, billing))
}

pub fn router<U, B>(subscription_usecase: Arc<SubscriptionUseCase<U, B>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    B: BillingGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/get-or-create-subscription", post(get_or_create_subscription))
        .with_state(subscription_usecase)
}

pub fn webhook_router<U, B>(subscription_usecase: Arc<SubscriptionUseCase<U, B>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    B: BillingGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/stripe/webhook", post(billing_webhook))
        .with_state(subscription_usecase)
}

pub async fn get_or_create_subscription<U, B>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, B>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<SubscriptionSetupModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    B: BillingGateway + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: setup request received");
    let setup = subscription_usecase.get_or_create(&user_id).await?;
    Ok(Json(setup))
}

pub async fn billing_webhook<U, B>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, B>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAckModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    B: BillingGateway + Send + Sync + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    subscription_usecase.handle_webhook(&body, signature).await?;
    Ok(Json(WebhookAckModel { received: true }))
}
