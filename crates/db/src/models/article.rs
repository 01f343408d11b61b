//! Reference article model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kbflow_core::types::Timestamp;

/// A row from the `articles` table.
///
/// Articles are reference data imported from the upstream knowledge base;
/// knowledge items point at them by `article_number`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    /// Externally-assigned identifier used for upstream URL generation.
    pub article_uuid: String,
    /// Human-facing article number, e.g. `KBA-01234-AB567`.
    pub article_number: String,
    pub title: String,
    pub content: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new article.
#[derive(Debug, Deserialize)]
pub struct CreateArticle {
    pub article_uuid: String,
    pub article_number: String,
    pub title: String,
    pub content: Option<String>,
}
