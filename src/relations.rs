//! Relationship descriptors between entities.
//!
//! Associations are plain `const` values handed to the store when it is
//! constructed, so every eager-loading query is built from a descriptor that
//! exists before the first request is served.

/// One-to-many association: one parent row owns many child rows through
/// `child_table.foreign_key -> parent_table.parent_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub parent_table: &'static str,
    pub parent_key: &'static str,
    pub child_table: &'static str,
    pub foreign_key: &'static str,
    /// Name under which the parent is nested when a child is loaded with it.
    pub alias: &'static str,
}

/// `User.hasMany(Article)` / `Article.belongsTo(User, as: "user")`.
pub const USER_ARTICLES: Association = Association {
    parent_table: "users",
    parent_key: "id",
    child_table: "articles",
    foreign_key: "user_id",
    alias: "user",
};

/// SQL derived from an [`Association`], built once per store.
#[derive(Debug, Clone)]
pub struct RelationQueries {
    /// Articles of one user, each joined with its owner. Binds `$1 = user id`.
    pub articles_with_user: String,
    /// One user joined with all of its articles. Binds `$1 = user id`.
    pub user_with_articles: String,
    pub count_children: String,
    pub detach_children: String,
    pub delete_children: String,
    pub delete_parent: String,
    pub lock_parent: String,
}

impl Association {
    pub fn queries(&self) -> RelationQueries {
        let Association {
            parent_table: parent,
            parent_key: pk,
            child_table: child,
            foreign_key: fk,
            alias,
        } = *self;

        RelationQueries {
            articles_with_user: format!(
                r#"
                SELECT c.id, c.{fk} AS user_id, c.title, c.body, c.created_at, c.updated_at,
                       "{alias}".{pk} AS author_id,
                       "{alias}".email AS author_email,
                       "{alias}".password AS author_password,
                       "{alias}".created_at AS author_created_at,
                       "{alias}".updated_at AS author_updated_at
                FROM {child} c
                LEFT JOIN {parent} AS "{alias}" ON "{alias}".{pk} = c.{fk}
                WHERE c.{fk} = $1
                ORDER BY c.id
                "#
            ),
            user_with_articles: format!(
                r#"
                SELECT p.{pk} AS id, p.email, p.password, p.created_at, p.updated_at,
                       c.id AS article_id,
                       c.{fk} AS article_user_id,
                       c.title AS article_title,
                       c.body AS article_body,
                       c.created_at AS article_created_at,
                       c.updated_at AS article_updated_at
                FROM {parent} p
                LEFT JOIN {child} c ON c.{fk} = p.{pk}
                WHERE p.{pk} = $1
                ORDER BY c.id
                "#
            ),
            count_children: format!("SELECT COUNT(*) FROM {child} WHERE {fk} = $1"),
            detach_children: format!(
                "UPDATE {child} SET {fk} = NULL, updated_at = now() WHERE {fk} = $1"
            ),
            delete_children: format!("DELETE FROM {child} WHERE {fk} = $1"),
            delete_parent: format!("DELETE FROM {parent} WHERE {pk} = $1"),
            lock_parent: format!("SELECT {pk} FROM {parent} WHERE {pk} = $1 FOR UPDATE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eager_load_joins_parent_under_alias() {
        let q = USER_ARTICLES.queries();
        assert!(q
            .articles_with_user
            .contains(r#"LEFT JOIN users AS "user" ON "user".id = c.user_id"#));
        assert!(q.articles_with_user.contains("WHERE c.user_id = $1"));
    }

    #[test]
    fn parent_with_children_filters_on_parent_key() {
        let q = USER_ARTICLES.queries();
        assert!(q.user_with_articles.contains("LEFT JOIN articles c ON c.user_id = p.id"));
        assert!(q.user_with_articles.contains("WHERE p.id = $1"));
    }

    #[test]
    fn deletion_queries_target_foreign_key() {
        let q = USER_ARTICLES.queries();
        assert_eq!(q.delete_children, "DELETE FROM articles WHERE user_id = $1");
        assert_eq!(q.count_children, "SELECT COUNT(*) FROM articles WHERE user_id = $1");
        assert!(q.detach_children.starts_with("UPDATE articles SET user_id = NULL"));
        assert_eq!(q.delete_parent, "DELETE FROM users WHERE id = $1");
    }
}
