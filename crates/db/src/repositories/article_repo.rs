//! Repository for the `articles` table.

use sqlx::PgPool;

use crate::models::article::{Article, CreateArticle};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "article_uuid, article_number, title, content, is_active, created_at, updated_at";

/// Provides data access for reference articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (article_uuid, article_number, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.article_uuid)
            .bind(&input.article_number)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find an article by its human-facing article number.
    pub async fn find_by_number(
        pool: &PgPool,
        article_number: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE article_number = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(article_number)
            .fetch_optional(pool)
            .await
    }

    /// List active articles ordered by article number.
    pub async fn list_active(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE is_active = true
             ORDER BY article_number
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
