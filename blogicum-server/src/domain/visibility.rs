use chrono::{DateTime, Utc};

use super::category::Category;
use super::post::Post;

/// Which posts a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    /// Published, already due and filed under a published category.
    Public { now: DateTime<Utc> },
    /// No filtering; only handed out to a profile owner looking at their own feed.
    Unrestricted,
}

impl Visibility {
    pub(crate) fn for_profile(viewer_id: Option<i64>, owner_id: i64, now: DateTime<Utc>) -> Self {
        if viewer_id == Some(owner_id) {
            Self::Unrestricted
        } else {
            Self::Public { now }
        }
    }

    /// Cut-off for `pub_date` when the filter applies.
    pub(crate) fn published_before(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Public { now } => Some(*now),
            Self::Unrestricted => None,
        }
    }

    pub(crate) fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        match self {
            Self::Public { now } => is_publicly_visible(post, category, *now),
            Self::Unrestricted => true,
        }
    }
}

/// A post without a category never passes: the category condition cannot hold.
pub(crate) fn is_publicly_visible(
    post: &Post,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> bool {
    post.is_published
        && post.pub_date <= now
        && category.is_some_and(|category| category.is_published)
}
