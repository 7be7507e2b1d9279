use sqlx::PgPool;
use tracing::debug;

use crate::{
    articles::repo_types::{Article, ArticleChanges, ArticleUserRow, ArticleWithUser, NewArticle},
    relations::RelationQueries,
    store::StoreError,
};

pub async fn list_all(db: &PgPool) -> Result<Vec<Article>, StoreError> {
    let rows = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, user_id, title, body, created_at, updated_at
        FROM articles
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(db: &PgPool, new: &NewArticle) -> Result<Article, StoreError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        INSERT INTO articles (user_id, title, body)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, title, body, created_at, updated_at
        "#,
    )
    .bind(new.user_id)
    .bind(&new.title)
    .bind(&new.body)
    .fetch_one(db)
    .await?;
    Ok(article)
}

/// Articles of one user with the owner joined in, in a single query.
pub async fn list_by_user_with_owner(
    db: &PgPool,
    queries: &RelationQueries,
    user_id: i64,
) -> Result<Vec<ArticleWithUser>, StoreError> {
    let rows = sqlx::query_as::<_, ArticleUserRow>(&queries.articles_with_user)
        .bind(user_id)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(ArticleWithUser::from).collect())
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Article>, StoreError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, user_id, title, body, created_at, updated_at
        FROM articles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(article)
}

/// Read-then-write partial update.
pub async fn update(
    db: &PgPool,
    id: i64,
    changes: ArticleChanges,
) -> Result<Option<Article>, StoreError> {
    let Some(current) = find_by_id(db, id).await? else {
        return Ok(None);
    };
    let (title, body) = changes.merge(&current);

    // Row may have been deleted since the read; that surfaces as None.
    let article = sqlx::query_as::<_, Article>(
        r#"
        UPDATE articles
        SET title = $2, body = $3, updated_at = now()
        WHERE id = $1
        RETURNING id, user_id, title, body, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(body)
    .fetch_optional(db)
    .await?;
    debug!(article_id = id, found = article.is_some(), "article updated");
    Ok(article)
}

pub async fn delete(db: &PgPool, id: i64) -> Result<bool, StoreError> {
    if find_by_id(db, id).await?.is_none() {
        return Ok(false);
    }
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
