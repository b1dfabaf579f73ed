use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentForm {
    pub(crate) text: String,
}

impl CommentForm {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            text: normalize_text(&self.text)?,
        })
    }
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        text: impl Into<String>,
        post_id: i64,
        author_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        for (field, value) in [("id", id), ("post_id", post_id), ("author_id", author_id)] {
            if value <= 0 {
                return Err(DomainError::validation(field, "must be > 0"));
            }
        }
        let text = normalize_text(&text.into())?;

        Ok(Self {
            id,
            text,
            post_id,
            author_id,
            created_at,
        })
    }
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::validation("text", "must not be empty"));
    }
    Ok(text.to_string())
}
