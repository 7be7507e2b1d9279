use sqlx::PgPool;
use tracing::debug;

use crate::{
    relations::RelationQueries,
    store::StoreError,
    users::repo_types::{
        NewUser, User, UserArticleRow, UserDeletePolicy, UserDeletion, UserWithArticles,
    },
};

pub async fn list_all(db: &PgPool) -> Result<Vec<User>, StoreError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, created_at, updated_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(users)
}

/// Create a new user. `email` is unique; a duplicate surfaces as
/// [`StoreError::UniqueViolation`].
pub async fn create(db: &PgPool, new: &NewUser) -> Result<User, StoreError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password)
        VALUES ($1, $2)
        RETURNING id, email, password, created_at, updated_at
        "#,
    )
    .bind(&new.email)
    .bind(&new.password_hash)
    .fetch_one(db)
    .await?;
    Ok(user)
}

/// One user with its articles, in a single join.
pub async fn find_with_articles(
    db: &PgPool,
    queries: &RelationQueries,
    id: i64,
) -> Result<Option<UserWithArticles>, StoreError> {
    let rows = sqlx::query_as::<_, UserArticleRow>(&queries.user_with_articles)
        .bind(id)
        .fetch_all(db)
        .await?;
    Ok(UserWithArticles::from_rows(rows))
}

/// Delete a user and apply `policy` to its articles inside one transaction.
pub async fn delete(
    db: &PgPool,
    queries: &RelationQueries,
    id: i64,
    policy: UserDeletePolicy,
) -> Result<Option<UserDeletion>, StoreError> {
    let mut tx = db.begin().await?;

    let locked = sqlx::query_scalar::<_, i64>(&queries.lock_parent)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if locked.is_none() {
        return Ok(None);
    }

    let articles_affected = match policy {
        UserDeletePolicy::Nullify => sqlx::query(&queries.detach_children)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected(),
        UserDeletePolicy::Cascade => sqlx::query(&queries.delete_children)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected(),
        UserDeletePolicy::Restrict => {
            let articles = sqlx::query_scalar::<_, i64>(&queries.count_children)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            if articles > 0 {
                return Err(StoreError::Restricted {
                    user_id: id,
                    articles,
                });
            }
            0
        }
    };

    sqlx::query(&queries.delete_parent)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    debug!(user_id = id, %policy, articles_affected, "user deleted");
    Ok(Some(UserDeletion {
        user_id: id,
        articles_affected,
    }))
}
