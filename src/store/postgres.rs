use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreError};
use crate::{
    articles::{
        repo as articles_repo,
        repo_types::{Article, ArticleChanges, ArticleWithUser, NewArticle},
    },
    relations::{Association, RelationQueries},
    users::{
        repo as users_repo,
        repo_types::{NewUser, User, UserDeletePolicy, UserDeletion, UserWithArticles},
    },
};

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
    queries: Arc<RelationQueries>,
}

impl PgStore {
    pub fn new(db: PgPool, association: &Association) -> Self {
        Self {
            db,
            queries: Arc::new(association.queries()),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        articles_repo::list_all(&self.db).await
    }

    async fn create_article(&self, new: NewArticle) -> Result<Article, StoreError> {
        articles_repo::create(&self.db, &new).await
    }

    async fn list_articles_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ArticleWithUser>, StoreError> {
        articles_repo::list_by_user_with_owner(&self.db, &self.queries, user_id).await
    }

    async fn find_article(&self, id: i64) -> Result<Option<Article>, StoreError> {
        articles_repo::find_by_id(&self.db, id).await
    }

    async fn update_article(
        &self,
        id: i64,
        changes: ArticleChanges,
    ) -> Result<Option<Article>, StoreError> {
        articles_repo::update(&self.db, id, changes).await
    }

    async fn delete_article(&self, id: i64) -> Result<bool, StoreError> {
        articles_repo::delete(&self.db, id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        users_repo::list_all(&self.db).await
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        users_repo::create(&self.db, &new).await
    }

    async fn find_user_with_articles(
        &self,
        id: i64,
    ) -> Result<Option<UserWithArticles>, StoreError> {
        users_repo::find_with_articles(&self.db, &self.queries, id).await
    }

    async fn delete_user(
        &self,
        id: i64,
        policy: UserDeletePolicy,
    ) -> Result<Option<UserDeletion>, StoreError> {
        users_repo::delete(&self.db, &self.queries, id, policy).await
    }
}
