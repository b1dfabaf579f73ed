use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

const SLUG_MAX_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) slug: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl Category {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        is_published: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        let slug = slug.into();
        validate_slug(&slug)?;

        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            slug,
            is_published,
            created_at,
        })
    }
}

/// Slugs end up in `/category/{slug}/`, so only unreserved URL characters are allowed.
pub(crate) fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
        return Err(DomainError::validation("slug", "must be 1..64 chars"));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::validation(
            "slug",
            "may contain only latin letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}
