use std::sync::Arc;

use crate::data::category_repository::{CategoryRepository, LocationRepository};
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;

pub(crate) mod auth_service;
pub(crate) mod blog_service;
pub(crate) mod comment_service;
pub(crate) mod pagination;
pub(crate) mod profile_service;

#[derive(Clone)]
pub(crate) struct Repositories {
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) comments: Arc<dyn CommentRepository>,
    pub(crate) categories: Arc<dyn CategoryRepository>,
    pub(crate) locations: Arc<dyn LocationRepository>,
}

pub(crate) fn require_actor(actor_id: Option<i64>) -> Result<i64, DomainError> {
    actor_id.ok_or(DomainError::Unauthenticated)
}
