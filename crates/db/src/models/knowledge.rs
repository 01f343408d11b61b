//! Knowledge item model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kbflow_core::types::{DbId, Timestamp};
use kbflow_core::workflow::ChangeKind;

/// A row from the `knowledge` table: one proposed edit or deletion against
/// a reference article.
///
/// `status`, `submitted_at`, `approved_at`, and `approved_by` are written
/// only through [`crate::repositories::KnowledgeRepo::apply_transition`];
/// the field-update path never touches them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Knowledge {
    pub id: DbId,
    pub article_number: String,
    pub change_type: String,
    pub title: String,
    pub info_category: Option<String>,
    pub keywords: Option<String>,
    pub importance: bool,
    pub target: Option<String>,
    pub open_publish_start: Option<NaiveDate>,
    pub open_publish_end: Option<NaiveDate>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub add_comments: Option<String>,
    pub remarks: Option<String>,
    pub status: String,
    pub created_by: DbId,
    pub submitted_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub approved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new knowledge item. Status starts at `draft`; the
/// owner comes from the authenticated caller, never the request body.
#[derive(Debug, Deserialize)]
pub struct CreateKnowledge {
    pub article_number: String,
    pub change_type: ChangeKind,
    pub title: String,
    pub info_category: Option<String>,
    pub keywords: Option<String>,
    #[serde(default)]
    pub importance: bool,
    pub target: Option<String>,
    pub open_publish_start: Option<NaiveDate>,
    pub open_publish_end: Option<NaiveDate>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub add_comments: Option<String>,
    pub remarks: Option<String>,
}

/// DTO for partially updating a knowledge item's content fields.
///
/// Only non-`None` fields are applied. Status, ownership, and the audit
/// timestamps are deliberately absent -- those move only through the
/// status workflow.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateKnowledge {
    pub title: Option<String>,
    pub info_category: Option<String>,
    pub keywords: Option<String>,
    pub importance: Option<bool>,
    pub target: Option<String>,
    pub open_publish_start: Option<NaiveDate>,
    pub open_publish_end: Option<NaiveDate>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub add_comments: Option<String>,
    pub remarks: Option<String>,
}

/// Query parameters for listing knowledge items.
#[derive(Debug, Deserialize)]
pub struct KnowledgeListParams {
    pub status: Option<String>,
    pub user_id: Option<DbId>,
    pub article_number: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
