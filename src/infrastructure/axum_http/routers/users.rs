use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    application::usecases::users::UserUseCase,
    domain::{
        repositories::users::UserRepository,
        value_objects::{iam::AuthUser, users::UserModel},
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository));

    router(Arc::new(user_usecase))
}

pub fn router<U>(user_usecase: Arc<UserUseCase<U>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/user", get(current_user))
        .with_state(user_usecase)
}

pub async fn current_user<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<UserModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let user = user_usecase.get_current_user(&user_id).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::users::tests::sample_user,
        domain::repositories::users::MockUserRepository,
        infrastructure::axum_http::routers::tests::{as_user, body_json, get},
    };
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn returns_the_callers_record() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .withf(|id| id == "user-7")
            .returning(|id| Ok(Some(sample_user(id, "active"))));

        let app = as_user(router(Arc::new(UserUseCase::new(Arc::new(user_repo)))), "user-7");
        let response = app.oneshot(get("/auth/user")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "user-7");
        assert_eq!(body["subscriptionStatus"], "active");
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));

        let app = as_user(router(Arc::new(UserUseCase::new(Arc::new(user_repo)))), "ghost");
        let response = app.oneshot(get("/auth/user")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
