use serde::{Deserialize, Serialize};

use crate::{
    articles::repo_types::{Article, ArticleChanges, NewArticle},
    error::ApiError,
    extractors::JsonPayload,
    validation::{lenient_id, non_empty, non_zero},
};

/// Request body for `POST /api/articles`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    /// JSON integer or base-10 string.
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<i64>,
}

impl JsonPayload for CreateArticleRequest {
    const REJECTION: &'static str = "All fields are required";
}

impl CreateArticleRequest {
    /// All three fields are required and must be non-empty.
    pub fn validate(self) -> Result<NewArticle, ApiError> {
        match (non_empty(self.title), non_empty(self.body), non_zero(self.user_id)) {
            (Some(title), Some(body), Some(user_id)) => Ok(NewArticle {
                user_id,
                title,
                body,
            }),
            _ => Err(ApiError::bad_request("All fields are required")),
        }
    }
}

/// Request body for `PUT /api/articles/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl JsonPayload for UpdateArticleRequest {
    const REJECTION: &'static str = "Invalid article fields";
}

impl From<UpdateArticleRequest> for ArticleChanges {
    fn from(req: UpdateArticleRequest) -> Self {
        Self {
            title: non_empty(req.title),
            body: non_empty(req.body),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse<T> {
    pub articles: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub article: Article,
}
