use super::comment::Comment;
use super::error::DomainError;
use super::post::Post;

pub(crate) trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

/// Only the author may change or remove an entity. There is no override.
pub(crate) fn ensure_author<T: Authored>(
    entity: &T,
    actor_id: i64,
    message: &'static str,
) -> Result<(), DomainError> {
    if entity.author_id() != actor_id {
        return Err(DomainError::Forbidden(message));
    }
    Ok(())
}
