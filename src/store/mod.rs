//! Data-access seam between the HTTP handlers and storage.

use async_trait::async_trait;

use crate::{
    articles::repo_types::{Article, ArticleChanges, ArticleWithUser, NewArticle},
    users::repo_types::{NewUser, User, UserDeletePolicy, UserDeletion, UserWithArticles},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures reported by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A value exceeds its column width, e.g. `users.email VARCHAR(30)`.
    #[error("value too long: {message}")]
    ValueTooLong { message: String },

    #[error("user {user_id} still owns {articles} article(s)")]
    Restricted { user_id: i64, articles: i64 },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
            // string_data_right_truncation
            if db_err.code().as_deref() == Some("22001") {
                return StoreError::ValueTooLong {
                    message: db_err.message().to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Every method is a single logical store operation.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError>;

    async fn create_article(&self, new: NewArticle) -> Result<Article, StoreError>;

    /// Articles owned by `user_id`, each with its owner eager-loaded.
    async fn list_articles_by_user(&self, user_id: i64)
        -> Result<Vec<ArticleWithUser>, StoreError>;

    async fn find_article(&self, id: i64) -> Result<Option<Article>, StoreError>;

    /// Reads the article, then writes the merged fields. `None` if absent.
    async fn update_article(
        &self,
        id: i64,
        changes: ArticleChanges,
    ) -> Result<Option<Article>, StoreError>;

    /// Returns `false` if no article had that id.
    async fn delete_article(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    async fn find_user_with_articles(
        &self,
        id: i64,
    ) -> Result<Option<UserWithArticles>, StoreError>;

    /// Deletes a user, applying `policy` to its articles. `None` if absent.
    async fn delete_user(
        &self,
        id: i64,
        policy: UserDeletePolicy,
    ) -> Result<Option<UserDeletion>, StoreError>;
}
