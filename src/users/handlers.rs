use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    extractors::{JsonBody, PathId},
    state::AppState,
    store::StoreError,
    users::{
        dto::{
            CreateUserRequest, UserArticlesResponse, UserDeletedResponse, UserResponse,
            UsersResponse,
        },
        password::hash_password,
        repo_types::NewUser,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/article/:id", get(get_user_with_articles))
        .route("/users/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = state.store.list_users().await?;
    Ok(Json(UsersResponse { users }))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let (email, password) = payload
        .validate()
        .inspect_err(|_| warn!("user fields missing"))?;

    let password_hash = hash_password(&password)?;

    let user = match state
        .store
        .create_user(NewUser {
            email,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(e @ StoreError::UniqueViolation { .. }) => {
            warn!(error = %e, "email already registered");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, email = %user.email, "user created");
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(state))]
pub async fn get_user_with_articles(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<UserArticlesResponse>> {
    let user = state
        .store
        .find_user_with_articles(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User does not exist"))?;
    Ok(Json(UserArticlesResponse { user: vec![user] }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<UserDeletedResponse>> {
    let policy = state.config.user_delete_policy;
    let deletion = state
        .store
        .delete_user(id, policy)
        .await?
        .ok_or_else(|| ApiError::not_found("User does not exist"))?;

    info!(
        user_id = id,
        %policy,
        articles_affected = deletion.articles_affected,
        "user deleted"
    );
    Ok(Json(UserDeletedResponse {
        msg: format!("User id of {id} has been removed."),
        articles_affected: deletion.articles_affected,
    }))
}
