//! Database models for lists.

use crate::api::models::lists::CreateListRequest;
use crate::types::{ListId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new list
#[derive(Debug, Clone)]
pub struct ListCreateDBRequest {
    pub name: String,
    pub author_id: UserId,
}

impl ListCreateDBRequest {
    pub fn new(author_id: UserId, api: CreateListRequest) -> Self {
        Self {
            name: api.name,
            author_id,
        }
    }
}

/// Database request for renaming a list
#[derive(Debug, Clone, Default)]
pub struct ListUpdateDBRequest {
    pub name: Option<String>,
}

/// Database response for a list
#[derive(Debug, Clone)]
pub struct ListDBResponse {
    pub id: ListId,
    pub name: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}
