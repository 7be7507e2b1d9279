use std::{fmt, str::FromStr};

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::articles::repo_types::Article;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // Argon2 PHC string, never the raw value
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Insert payload. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// A user with its articles eager-loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithArticles {
    #[serde(flatten)]
    pub user: User,
    pub articles: Vec<Article>,
}

/// What happens to a user's articles when the user is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserDeletePolicy {
    /// Keep the articles and clear their `user_id`.
    #[default]
    Nullify,
    /// Delete the articles together with the user.
    Cascade,
    /// Refuse to delete a user that still owns articles.
    Restrict,
}

impl FromStr for UserDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nullify" => Ok(Self::Nullify),
            "cascade" => Ok(Self::Cascade),
            "restrict" => Ok(Self::Restrict),
            other => Err(format!(
                "unknown user delete policy {other:?} (expected nullify, cascade or restrict)"
            )),
        }
    }
}

impl fmt::Display for UserDeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nullify => "nullify",
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
        })
    }
}

/// Outcome of a successful user deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDeletion {
    pub user_id: i64,
    /// Articles detached or deleted, depending on the policy.
    pub articles_affected: u64,
}

/// One row of `users LEFT JOIN articles`.
#[derive(Debug, FromRow)]
pub(crate) struct UserArticleRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub article_id: Option<i64>,
    pub article_user_id: Option<i64>,
    pub article_title: Option<String>,
    pub article_body: Option<String>,
    pub article_created_at: Option<OffsetDateTime>,
    pub article_updated_at: Option<OffsetDateTime>,
}

impl UserArticleRow {
    fn article(&self) -> Option<Article> {
        Some(Article {
            id: self.article_id?,
            user_id: self.article_user_id,
            title: self.article_title.clone(),
            body: self.article_body.clone(),
            created_at: self.article_created_at?,
            updated_at: self.article_updated_at?,
        })
    }
}

impl UserWithArticles {
    /// Folds joined rows (all for the same user) into one nested value.
    pub(crate) fn from_rows(rows: Vec<UserArticleRow>) -> Option<Self> {
        let first = rows.first()?;
        let user = User {
            id: first.id,
            email: first.email.clone(),
            password: first.password.clone(),
            created_at: first.created_at,
            updated_at: first.updated_at,
        };
        let articles = rows.iter().filter_map(UserArticleRow::article).collect();
        Some(Self { user, articles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn row(article_id: Option<i64>) -> UserArticleRow {
        let ts = datetime!(2024-01-01 0:00 UTC);
        UserArticleRow {
            id: 1,
            email: "a@x.com".into(),
            password: "$argon2id$hash".into(),
            created_at: ts,
            updated_at: ts,
            article_id,
            article_user_id: article_id.map(|_| 1),
            article_title: article_id.map(|_| "T".to_string()),
            article_body: article_id.map(|_| "B".to_string()),
            article_created_at: article_id.map(|_| ts),
            article_updated_at: article_id.map(|_| ts),
        }
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Cascade".parse::<UserDeletePolicy>(), Ok(UserDeletePolicy::Cascade));
        assert_eq!(" restrict ".parse::<UserDeletePolicy>(), Ok(UserDeletePolicy::Restrict));
        assert_eq!("nullify".parse::<UserDeletePolicy>(), Ok(UserDeletePolicy::Nullify));
        assert!("orphan".parse::<UserDeletePolicy>().is_err());
    }

    #[test]
    fn policy_display_round_trips() {
        for p in [
            UserDeletePolicy::Nullify,
            UserDeletePolicy::Cascade,
            UserDeletePolicy::Restrict,
        ] {
            assert_eq!(p.to_string().parse::<UserDeletePolicy>(), Ok(p));
        }
    }

    #[test]
    fn fold_user_without_articles() {
        let nested = UserWithArticles::from_rows(vec![row(None)]).expect("user row");
        assert_eq!(nested.user.id, 1);
        assert!(nested.articles.is_empty());
    }

    #[test]
    fn fold_user_with_articles() {
        let nested = UserWithArticles::from_rows(vec![row(Some(3)), row(Some(4))]).unwrap();
        let ids: Vec<i64> = nested.articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn fold_no_rows_is_none() {
        assert!(UserWithArticles::from_rows(Vec::new()).is_none());
    }

    #[test]
    fn password_is_never_serialized() {
        let nested = UserWithArticles::from_rows(vec![row(Some(3))]).unwrap();
        let json = serde_json::to_value(&nested).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["articles"][0]["title"], "T");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
    }
}
