use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::blog_service::load_page;
use super::pagination::{Page, PageRequest};
use super::require_actor;
use crate::data::post_repository::{PostFilter, PostListItem, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{ProfileFields, User};
use crate::domain::visibility::Visibility;

#[derive(Debug, Clone)]
pub(crate) struct ProfileFeed {
    pub(crate) user: User,
    pub(crate) is_owner: bool,
    pub(crate) page: Page<PostListItem>,
}

pub(crate) struct ProfileService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl ProfileService {
    pub(crate) fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// The owner sees every own post, drafts and scheduled ones included.
    pub(crate) async fn profile_feed(
        &self,
        viewer_id: Option<i64>,
        username: &str,
        page: PageRequest,
    ) -> Result<ProfileFeed, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .map(|creds| creds.user)
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        let visibility = Visibility::for_profile(viewer_id, user.id, Utc::now());
        let filter = PostFilter {
            author_id: Some(user.id),
            category_id: None,
            visibility,
        };
        let page = load_page(self.posts.as_ref(), filter, page).await?;

        Ok(ProfileFeed {
            is_owner: visibility == Visibility::Unrestricted,
            user,
            page,
        })
    }

    pub(crate) async fn profile_for_edit(&self, actor_id: Option<i64>) -> Result<User, DomainError> {
        let actor_id = require_actor(actor_id)?;
        self.users
            .get_user(actor_id)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    pub(crate) async fn update_profile(
        &self,
        actor_id: Option<i64>,
        profile: ProfileFields,
    ) -> Result<User, DomainError> {
        let actor_id = require_actor(actor_id)?;
        let profile = profile.validate()?;

        let user = self
            .users
            .update_profile(actor_id, profile)
            .await?
            .ok_or(DomainError::Unauthenticated)?;
        info!(user_id = user.id, "profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ProfileService;
    use crate::application::pagination::PageRequest;
    use crate::data::repositories::memory::InMemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::user::ProfileFields;

    fn service(store: &InMemoryStore) -> ProfileService {
        ProfileService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn fields(username: &str) -> ProfileFields {
        ProfileFields {
            username: username.to_string(),
            first_name: " Jane ".to_string(),
            last_name: "Doe".to_string(),
            email: "JANE@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn owner_sees_drafts_and_others_only_published() {
        let store = InMemoryStore::new();
        let owner = store.add_user("owner");
        let other = store.add_user("other");
        let open = store.add_category("open", true);
        let published = store.add_post(owner.id, Some(open.id), true, 2);
        let draft = store.add_post(owner.id, Some(open.id), false, 1);
        let service = service(&store);

        let own = service
            .profile_feed(Some(owner.id), "owner", PageRequest::first())
            .await
            .expect("profile must load");
        assert!(own.is_owner);
        let ids: Vec<i64> = own.page.items.iter().map(|item| item.post.id).collect();
        assert_eq!(ids, vec![draft.id, published.id]);

        for viewer in [Some(other.id), None] {
            let foreign = service
                .profile_feed(viewer, "owner", PageRequest::first())
                .await
                .expect("profile must load");
            assert!(!foreign.is_owner);
            let ids: Vec<i64> = foreign.page.items.iter().map(|item| item.post.id).collect();
            assert_eq!(ids, vec![published.id]);
        }
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let store = InMemoryStore::new();
        let err = service(&store)
            .profile_feed(None, "ghost", PageRequest::first())
            .await
            .expect_err("ghost must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_profile_normalizes_fields() {
        let store = InMemoryStore::new();
        let user = store.add_user("jane");

        let updated = service(&store)
            .update_profile(Some(user.id), fields("jane_doe"))
            .await
            .expect("update must succeed");
        assert_eq!(updated.username, "jane_doe");
        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.email, "jane@example.com");
        assert_eq!(store.user(user.id).unwrap().username, "jane_doe");
    }

    #[tokio::test]
    async fn update_profile_rejects_taken_username() {
        let store = InMemoryStore::new();
        let user = store.add_user("jane");
        store.add_user("taken");

        let err = service(&store)
            .update_profile(Some(user.id), fields("taken"))
            .await
            .expect_err("username is taken");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn profile_edit_requires_authentication() {
        let store = InMemoryStore::new();
        let err = service(&store)
            .profile_for_edit(None)
            .await
            .expect_err("anonymous");
        assert!(matches!(err, DomainError::Unauthenticated));
    }
}
