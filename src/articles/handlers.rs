use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    articles::{
        dto::{ArticleResponse, ArticlesResponse, CreateArticleRequest, UpdateArticleRequest},
        repo_types::{Article, ArticleWithUser},
    },
    error::{ApiError, ApiResult, Message},
    extractors::{JsonBody, PathId},
    state::AppState,
};

pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/user/:id", get(list_user_articles))
        .route(
            "/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
}

#[instrument(skip(state))]
pub async fn list_articles(
    State(state): State<AppState>,
) -> ApiResult<Json<ArticlesResponse<Article>>> {
    let articles = state.store.list_articles().await?;
    Ok(Json(ArticlesResponse { articles }))
}

#[instrument(skip(state, payload))]
pub async fn create_article(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateArticleRequest>,
) -> ApiResult<Json<ArticleResponse>> {
    let new = payload.validate().inspect_err(|_| warn!("article fields missing"))?;
    let article = state.store.create_article(new).await?;
    info!(article_id = article.id, user_id = ?article.user_id, "article created");
    Ok(Json(ArticleResponse { article }))
}

#[instrument(skip(state))]
pub async fn list_user_articles(
    State(state): State<AppState>,
    PathId(user_id): PathId,
) -> ApiResult<Json<ArticlesResponse<ArticleWithUser>>> {
    let articles = state.store.list_articles_by_user(user_id).await?;
    if articles.is_empty() {
        return Err(ApiError::not_found("Article for that user does not exist"));
    }
    Ok(Json(ArticlesResponse { articles }))
}

#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<ArticlesResponse<Article>>> {
    let article = state
        .store
        .find_article(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article does not exist"))?;
    Ok(Json(ArticlesResponse {
        articles: vec![article],
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_article(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<UpdateArticleRequest>,
) -> ApiResult<Json<ArticleResponse>> {
    let article = state
        .store
        .update_article(id, payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Article does not exist"))?;
    info!(article_id = article.id, "article updated");
    Ok(Json(ArticleResponse { article }))
}

#[instrument(skip(state))]
pub async fn delete_article(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Message>> {
    if !state.store.delete_article(id).await? {
        return Err(ApiError::not_found("Article does not exist"));
    }
    info!(article_id = id, "article deleted");
    Ok(Json(Message::new(format!("Article id of {id} has been removed."))))
}
