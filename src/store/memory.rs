//! In-process [`Store`] with the same observable rules as Postgres: column
//! widths, unique email, foreign key on article owner, partial update and
//! delete policies.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{Store, StoreError};
use crate::{
    articles::repo_types::{Article, ArticleChanges, ArticleWithUser, NewArticle},
    users::repo_types::{NewUser, User, UserDeletePolicy, UserDeletion, UserWithArticles},
};

const EMAIL_MAX_CHARS: usize = 30;
const TEXT_MAX_CHARS: usize = 255;

/// Mirrors `VARCHAR(n)`: width is counted in characters.
fn check_width(value: &str, max: usize) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::ValueTooLong {
            message: format!("value too long for type character varying({max})"),
        });
    }
    Ok(())
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    articles: BTreeMap<i64, Article>,
    last_user_id: i64,
    last_article_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.tables().articles.values().cloned().collect())
    }

    async fn create_article(&self, new: NewArticle) -> Result<Article, StoreError> {
        check_width(&new.title, TEXT_MAX_CHARS)?;
        check_width(&new.body, TEXT_MAX_CHARS)?;
        let mut t = self.tables();
        if !t.users.contains_key(&new.user_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "articles_user_id_fkey".into(),
            });
        }
        t.last_article_id += 1;
        let now = OffsetDateTime::now_utc();
        let article = Article {
            id: t.last_article_id,
            user_id: Some(new.user_id),
            title: Some(new.title),
            body: Some(new.body),
            created_at: now,
            updated_at: now,
        };
        t.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn list_articles_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ArticleWithUser>, StoreError> {
        let t = self.tables();
        let owner = t.users.get(&user_id).cloned();
        Ok(t.articles
            .values()
            .filter(|a| a.user_id == Some(user_id))
            .map(|a| ArticleWithUser {
                article: a.clone(),
                user: owner.clone(),
            })
            .collect())
    }

    async fn find_article(&self, id: i64) -> Result<Option<Article>, StoreError> {
        Ok(self.tables().articles.get(&id).cloned())
    }

    async fn update_article(
        &self,
        id: i64,
        changes: ArticleChanges,
    ) -> Result<Option<Article>, StoreError> {
        let mut t = self.tables();
        let Some(article) = t.articles.get_mut(&id) else {
            return Ok(None);
        };
        let (title, body) = changes.merge(article);
        for value in [&title, &body].into_iter().flatten() {
            check_width(value, TEXT_MAX_CHARS)?;
        }
        article.title = title;
        article.body = body;
        article.updated_at = OffsetDateTime::now_utc();
        Ok(Some(article.clone()))
    }

    async fn delete_article(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables().articles.remove(&id).is_some())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables().users.values().cloned().collect())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        check_width(&new.email, EMAIL_MAX_CHARS)?;
        let mut t = self.tables();
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::UniqueViolation {
                constraint: "users_email_key".into(),
            });
        }
        t.last_user_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: t.last_user_id,
            email: new.email,
            password: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_with_articles(
        &self,
        id: i64,
    ) -> Result<Option<UserWithArticles>, StoreError> {
        let t = self.tables();
        Ok(t.users.get(&id).map(|user| UserWithArticles {
            user: user.clone(),
            articles: t
                .articles
                .values()
                .filter(|a| a.user_id == Some(id))
                .cloned()
                .collect(),
        }))
    }

    async fn delete_user(
        &self,
        id: i64,
        policy: UserDeletePolicy,
    ) -> Result<Option<UserDeletion>, StoreError> {
        let mut t = self.tables();
        if !t.users.contains_key(&id) {
            return Ok(None);
        }
        let owned: Vec<i64> = t
            .articles
            .values()
            .filter(|a| a.user_id == Some(id))
            .map(|a| a.id)
            .collect();

        match policy {
            UserDeletePolicy::Restrict if !owned.is_empty() => {
                return Err(StoreError::Restricted {
                    user_id: id,
                    articles: owned.len() as i64,
                });
            }
            UserDeletePolicy::Restrict => {}
            UserDeletePolicy::Cascade => {
                for article_id in &owned {
                    t.articles.remove(article_id);
                }
            }
            UserDeletePolicy::Nullify => {
                let now = OffsetDateTime::now_utc();
                for article_id in &owned {
                    if let Some(a) = t.articles.get_mut(article_id) {
                        a.user_id = None;
                        a.updated_at = now;
                    }
                }
            }
        }
        t.users.remove(&id);

        Ok(Some(UserDeletion {
            user_id: id,
            articles_affected: owned.len() as u64,
        }))
    }
}
