//! Repository for the `knowledge` table.
//!
//! Status changes go through [`KnowledgeRepo::find_for_update`] and
//! [`KnowledgeRepo::apply_transition`] inside one caller-owned transaction,
//! so concurrent status changes on the same row serialize on the row lock
//! instead of losing updates.

use sqlx::{PgConnection, PgPool};

use kbflow_core::types::DbId;
use kbflow_core::workflow::{FieldUpdate, TransitionPlan};

use crate::models::knowledge::{CreateKnowledge, Knowledge, UpdateKnowledge};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, article_number, change_type, title, info_category, keywords, \
    importance, target, open_publish_start, open_publish_end, \
    question, answer, add_comments, remarks, status, created_by, \
    submitted_at, approved_at, approved_by, created_at, updated_at";

/// Provides CRUD and workflow operations for knowledge items.
pub struct KnowledgeRepo;

impl KnowledgeRepo {
    /// Insert a new knowledge item in `draft` status, returning the row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateKnowledge,
    ) -> Result<Knowledge, sqlx::Error> {
        let query = format!(
            "INSERT INTO knowledge \
                (article_number, change_type, title, info_category, keywords, \
                 importance, target, open_publish_start, open_publish_end, \
                 question, answer, add_comments, remarks, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Knowledge>(&query)
            .bind(&input.article_number)
            .bind(input.change_type.as_str())
            .bind(&input.title)
            .bind(&input.info_category)
            .bind(&input.keywords)
            .bind(input.importance)
            .bind(&input.target)
            .bind(input.open_publish_start)
            .bind(input.open_publish_end)
            .bind(&input.question)
            .bind(&input.answer)
            .bind(&input.add_comments)
            .bind(&input.remarks)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a knowledge item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Knowledge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM knowledge WHERE id = $1");
        sqlx::query_as::<_, Knowledge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List knowledge items with optional filters for status, owner, and
    /// article number.
    ///
    /// Results are ordered newest-first.
    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        user_id: Option<DbId>,
        article_number: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Knowledge>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if user_id.is_some() {
            conditions.push(format!("created_by = ${param_idx}"));
            param_idx += 1;
        }
        if article_number.is_some() {
            conditions.push(format!("article_number = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM knowledge {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Knowledge>(&query);

        if let Some(s) = status {
            q = q.bind(s);
        }
        if let Some(uid) = user_id {
            q = q.bind(uid);
        }
        if let Some(num) = article_number {
            q = q.bind(num);
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }

    /// Update a knowledge item's content fields. Only non-`None` fields in
    /// `input` are applied; status and the audit columns are never touched
    /// here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        input: &UpdateKnowledge,
    ) -> Result<Option<Knowledge>, sqlx::Error> {
        let query = format!(
            "UPDATE knowledge SET
                title = COALESCE($2, title),
                info_category = COALESCE($3, info_category),
                keywords = COALESCE($4, keywords),
                importance = COALESCE($5, importance),
                target = COALESCE($6, target),
                open_publish_start = COALESCE($7, open_publish_start),
                open_publish_end = COALESCE($8, open_publish_end),
                question = COALESCE($9, question),
                answer = COALESCE($10, answer),
                add_comments = COALESCE($11, add_comments),
                remarks = COALESCE($12, remarks),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Knowledge>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.info_category)
            .bind(&input.keywords)
            .bind(input.importance)
            .bind(&input.target)
            .bind(input.open_publish_start)
            .bind(input.open_publish_end)
            .bind(&input.question)
            .bind(&input.answer)
            .bind(&input.add_comments)
            .bind(&input.remarks)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a knowledge item with a row lock, for a status change.
    ///
    /// Must run inside a transaction; the lock is held until commit so
    /// concurrent status changes on the same row serialize.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Knowledge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM knowledge WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Knowledge>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Apply a planned status transition, writing exactly the fields the
    /// plan names. Run on the same connection that took the row lock.
    pub async fn apply_transition(
        conn: &mut PgConnection,
        id: DbId,
        plan: &TransitionPlan,
    ) -> Result<Knowledge, sqlx::Error> {
        let mut sets: Vec<String> = vec!["status = $2".to_string(), "updated_at = NOW()".to_string()];
        let mut param_idx: usize = 3;

        if let FieldUpdate::Set(_) = plan.submitted_at {
            sets.push(format!("submitted_at = ${param_idx}"));
            param_idx += 1;
        }

        match plan.approval {
            FieldUpdate::Set(_) => {
                sets.push(format!("approved_at = ${param_idx}"));
                sets.push(format!("approved_by = ${}", param_idx + 1));
            }
            FieldUpdate::Clear => {
                sets.push("approved_at = NULL".to_string());
                sets.push("approved_by = NULL".to_string());
            }
            FieldUpdate::Keep => {}
        }

        let query = format!(
            "UPDATE knowledge SET {} WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Knowledge>(&query)
            .bind(id)
            .bind(plan.status.as_str());

        if let FieldUpdate::Set(ts) = plan.submitted_at {
            q = q.bind(ts);
        }
        if let FieldUpdate::Set((ts, by)) = plan.approval {
            q = q.bind(ts).bind(by);
        }

        q.fetch_one(conn).await
    }

    /// Delete a knowledge item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM knowledge WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
