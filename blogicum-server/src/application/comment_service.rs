use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::require_actor;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentForm};
use crate::domain::error::DomainError;
use crate::domain::ownership::ensure_author;
use crate::domain::visibility::is_publicly_visible;

pub(crate) struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub(crate) fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn add_comment(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let author_id = self.commentable_post(actor_id, post_id).await?;
        let form = form.validate()?;

        let comment = self
            .comments
            .create_comment(NewComment {
                text: form.text,
                post_id,
                author_id,
            })
            .await?;
        info!(comment_id = comment.id, post_id, author_id, "comment added");
        Ok(comment)
    }

    pub(crate) async fn comment_for_edit(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        let (_, comment) = self
            .owned_comment(actor_id, post_id, comment_id, "you cannot edit this comment")
            .await?;
        Ok(comment)
    }

    pub(crate) async fn update_comment(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        comment_id: i64,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let (actor_id, _) = self
            .owned_comment(actor_id, post_id, comment_id, "you cannot edit this comment")
            .await?;
        let form = form.validate()?;

        let comment = self
            .comments
            .update_comment_owned(comment_id, actor_id, form.text)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;
        info!(comment_id, post_id, author_id = actor_id, "comment updated");
        Ok(comment)
    }

    pub(crate) async fn comment_for_delete(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        let (_, comment) = self
            .owned_comment(actor_id, post_id, comment_id, "you cannot delete this comment")
            .await?;
        Ok(comment)
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        let (actor_id, _) = self
            .owned_comment(actor_id, post_id, comment_id, "you cannot delete this comment")
            .await?;

        let deleted = self
            .comments
            .delete_comment_owned(comment_id, actor_id)
            .await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        info!(comment_id, post_id, author_id = actor_id, "comment deleted");
        Ok(())
    }

    /// Only publicly visible posts take comments; any other post counts as missing.
    /// Returns the commenting user.
    pub(crate) async fn commentable_post(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
    ) -> Result<i64, DomainError> {
        let item = self
            .posts
            .get_post_item(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;
        let author_id = require_actor(actor_id)?;
        if !is_publicly_visible(&item.post, item.category.as_ref(), Utc::now()) {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(author_id)
    }

    async fn owned_comment(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        comment_id: i64,
        refusal: &'static str,
    ) -> Result<(i64, Comment), DomainError> {
        let comment = self
            .comments
            .get_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;
        let actor_id = require_actor(actor_id)?;
        if let Err(err) = ensure_author(&comment, actor_id, refusal) {
            warn!(comment_id, actor_id, "comment ownership check refused");
            return Err(err);
        }
        Ok((actor_id, comment))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::CommentService;
    use crate::data::repositories::memory::InMemoryStore;
    use crate::domain::comment::CommentForm;
    use crate::domain::error::DomainError;

    fn service(store: &InMemoryStore) -> CommentService {
        CommentService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn form(text: &str) -> CommentForm {
        CommentForm {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn add_comment_to_visible_post() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let reader = store.add_user("reader");
        let open = store.add_category("open", true);
        let post = store.add_post(author.id, Some(open.id), true, 1);

        let comment = service(&store)
            .add_comment(Some(reader.id), post.id, form("  great  "))
            .await
            .expect("comment must be added");
        assert_eq!(comment.text, "great");
        assert_eq!(comment.author_id, reader.id);
        assert_eq!(store.comments_of(post.id).len(), 1);
    }

    #[tokio::test]
    async fn add_comment_requires_authentication() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let open = store.add_category("open", true);
        let post = store.add_post(author.id, Some(open.id), true, 1);

        let err = service(&store)
            .add_comment(None, post.id, form("hi"))
            .await
            .expect_err("anonymous comment must fail");
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn add_comment_to_hidden_post_is_not_found() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let reader = store.add_user("reader");
        let open = store.add_category("open", true);
        let draft = store.add_post(author.id, Some(open.id), false, 1);
        let service = service(&store);

        for actor in [reader.id, author.id] {
            let err = service
                .add_comment(Some(actor), draft.id, form("hi"))
                .await
                .expect_err("draft must be hidden");
            assert!(matches!(err, DomainError::NotFound(_)));
        }
        assert!(store.comments_of(draft.id).is_empty());
    }

    #[tokio::test]
    async fn comment_is_looked_up_within_its_post() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let first = store.add_post(author.id, None, true, 1);
        let second = store.add_post(author.id, None, true, 1);
        let comment = store.add_comment(first.id, author.id, "text");

        let err = service(&store)
            .comment_for_edit(Some(author.id), second.id, comment.id)
            .await
            .expect_err("wrong post");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn edit_by_non_author_is_forbidden_and_changes_nothing() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let intruder = store.add_user("intruder");
        let post = store.add_post(author.id, None, true, 1);
        let comment = store.add_comment(post.id, author.id, "original");

        let err = service(&store)
            .update_comment(Some(intruder.id), post.id, comment.id, form("changed"))
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(store.comment(comment.id).unwrap().text, "original");
    }

    #[tokio::test]
    async fn edit_by_author_updates_text() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let post = store.add_post(author.id, None, true, 1);
        let comment = store.add_comment(post.id, author.id, "original");

        let updated = service(&store)
            .update_comment(Some(author.id), post.id, comment.id, form("changed"))
            .await
            .expect("author may edit");
        assert_eq!(updated.text, "changed");
        assert_eq!(store.comment(comment.id).unwrap().text, "changed");
    }

    #[tokio::test]
    async fn delete_by_non_author_is_forbidden() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let intruder = store.add_user("intruder");
        let post = store.add_post(author.id, None, true, 1);
        let comment = store.add_comment(post.id, author.id, "text");

        let err = service(&store)
            .delete_comment(Some(intruder.id), post.id, comment.id)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert!(store.comment(comment.id).is_some());
    }

    #[tokio::test]
    async fn delete_by_author_removes_comment() {
        let store = InMemoryStore::new();
        let author = store.add_user("author");
        let post = store.add_post(author.id, None, true, 1);
        let comment = store.add_comment(post.id, author.id, "text");

        service(&store)
            .delete_comment(Some(author.id), post.id, comment.id)
            .await
            .expect("author may delete");
        assert!(store.comment(comment.id).is_none());
    }
}
