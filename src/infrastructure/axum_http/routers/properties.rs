use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};
use tracing::info;

use crate::{
    application::usecases::properties::PropertyUseCase,
    domain::{
        repositories::properties::PropertyRepository,
        value_objects::{
            iam::AuthUser,
            properties::{CoverageExclusion, PropertyModel, VerifyPropertyModel},
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{postgres_connection::PgPoolSquad, repositories::properties::PropertyPostgres},
    },
};

fn usecase(db_pool: Arc<PgPoolSquad>) -> Arc<PropertyUseCase<PropertyPostgres>> {
    let property_repository = PropertyPostgres::new(db_pool);
    Arc::new(PropertyUseCase::new(Arc::new(property_repository)))
}

/// Session-guarded property routes.
pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    router(usecase(db_pool))
}

/// Routes that need no session.
pub fn public_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    public_router(usecase(db_pool))
}

pub fn router<P>(property_usecase: Arc<PropertyUseCase<P>>) -> Router
where
    P: PropertyRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/properties", get(list_properties).post(verify_property))
        .with_state(property_usecase)
}

pub fn public_router<P>(property_usecase: Arc<PropertyUseCase<P>>) -> Router
where
    P: PropertyRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/properties/exclusions", get(list_exclusions))
        .with_state(property_usecase)
}

pub async fn verify_property<P>(
    State(property_usecase): State<Arc<PropertyUseCase<P>>>,
    AuthUser { user_id, .. }: AuthUser,
    payload: Result<Json<VerifyPropertyModel>, JsonRejection>,
) -> Result<Json<PropertyModel>, AppError>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    info!(%user_id, "properties: verification request received");
    let Json(verify_property_model) = payload?;

    let property = property_usecase
        .verify(&user_id, verify_property_model)
        .await?;
    Ok(Json(property))
}

pub async fn list_properties<P>(
    State(property_usecase): State<Arc<PropertyUseCase<P>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Vec<PropertyModel>>, AppError>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    let properties = property_usecase.list(&user_id).await?;
    Ok(Json(properties))
}

pub async fn list_exclusions<P>(
    State(property_usecase): State<Arc<PropertyUseCase<P>>>,
) -> Json<&'static [CoverageExclusion]>
where
    P: PropertyRepository + Send + Sync + 'static,
{
    Json(property_usecase.documented_exclusions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::properties::tests::stored_property,
        domain::repositories::properties::MockPropertyRepository,
        infrastructure::axum_http::routers::tests::{as_user, body_json, get, post_json},
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn small_owner_occupied_building_is_not_covered() {
        let mut property_repo = MockPropertyRepository::new();
        property_repo
            .expect_create()
            .withf(|insert| insert.user_id == "user-1" && !insert.is_rtlo_covered)
            .times(1)
            .returning(|insert| Ok(stored_property(insert)));

        let app = as_user(
            router(Arc::new(PropertyUseCase::new(Arc::new(property_repo)))),
            "user-1",
        );
        let response = app
            .oneshot(post_json(
                "/properties",
                json!({
                    "address": "123 W Fullerton",
                    "zipCode": "60614",
                    "propertyType": "multi-unit",
                    "units": 4,
                    "isOwnerOccupied": true,
                    "isRtloCovered": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["isRtloCovered"], false);
        assert_eq!(body["city"], "Chicago");
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let mut property_repo = MockPropertyRepository::new();
        property_repo.expect_create().never();

        let app = as_user(
            router(Arc::new(PropertyUseCase::new(Arc::new(property_repo)))),
            "user-1",
        );
        let response = app
            .oneshot(post_json("/properties", json!({ "units": "many" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["reason"], "validation_failed");
    }

    #[tokio::test]
    async fn exclusions_are_listed_without_a_session() {
        let app = public_router(Arc::new(PropertyUseCase::new(Arc::new(
            MockPropertyRepository::new(),
        ))));
        let response = app.oneshot(get("/properties/exclusions")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let enforced = body
            .as_array()
            .unwrap()
            .iter()
            .filter(|exclusion| exclusion["enforced"] == true)
            .count();
        assert_eq!(enforced, 1);
    }
}
