use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::repo_types::User;

/// Article record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub user_id: Option<i64>, // nullable FK to users.id
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated insert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl ArticleChanges {
    /// Returns the `(title, body)` to write over `current`.
    pub fn merge(self, current: &Article) -> (Option<String>, Option<String>) {
        (
            self.title.or_else(|| current.title.clone()),
            self.body.or_else(|| current.body.clone()),
        )
    }
}

/// An article with its owner eager-loaded under `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleWithUser {
    #[serde(flatten)]
    pub article: Article,
    pub user: Option<User>,
}

/// One row of `articles LEFT JOIN users`, owner columns prefixed `author_`.
#[derive(Debug, FromRow)]
pub(crate) struct ArticleUserRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_id: Option<i64>,
    pub author_email: Option<String>,
    pub author_password: Option<String>,
    pub author_created_at: Option<OffsetDateTime>,
    pub author_updated_at: Option<OffsetDateTime>,
}

impl From<ArticleUserRow> for ArticleWithUser {
    fn from(r: ArticleUserRow) -> Self {
        let user = match (
            r.author_id,
            r.author_email,
            r.author_password,
            r.author_created_at,
            r.author_updated_at,
        ) {
            (Some(id), Some(email), Some(password), Some(created_at), Some(updated_at)) => {
                Some(User {
                    id,
                    email,
                    password,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };
        Self {
            article: Article {
                id: r.id,
                user_id: r.user_id,
                title: r.title,
                body: r.body,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            user,
        }
    }
}
