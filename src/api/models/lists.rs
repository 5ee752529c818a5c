//! API request/response models for lists.

use crate::db::models::lists::ListDBResponse;
use crate::types::{ListId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form submitted to create a list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateListRequest {
    pub name: String,
}

/// Create-list form information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateListInfo {
    /// Status message
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    pub id: ListId,
    pub name: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<ListDBResponse> for ListResponse {
    fn from(db: ListDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            author_id: db.author_id,
            created_at: db.created_at,
        }
    }
}
