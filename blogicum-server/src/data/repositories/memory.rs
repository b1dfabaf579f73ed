//! In-memory implementation of every repository trait, shared by the service and router tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::application::Repositories;
use crate::data::category_repository::{CategoryRepository, LocationRepository};
use crate::data::comment_repository::{CommentItem, CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostListItem, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostFields};
use crate::domain::user::{ProfileFields, User};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<UserCredentials>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i64) -> Option<&User> {
        self.users
            .iter()
            .map(|creds| &creds.user)
            .find(|user| user.id == id)
    }

    fn category(&self, id: Option<i64>) -> Option<&Category> {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
    }

    fn location(&self, id: Option<i64>) -> Option<&Location> {
        id.and_then(|id| self.locations.iter().find(|l| l.id == id))
    }

    fn check_references(&self, fields: &PostFields) -> Result<(), DomainError> {
        if fields.category_id.is_some() && self.category(fields.category_id).is_none() {
            return Err(DomainError::validation("category_id", "unknown category"));
        }
        if fields.location_id.is_some() && self.location(fields.location_id).is_none() {
            return Err(DomainError::validation("location_id", "unknown location"));
        }
        Ok(())
    }

    fn item(&self, post: &Post) -> PostListItem {
        PostListItem {
            post: post.clone(),
            author_username: self
                .user(post.author_id)
                .map(|user| user.username.clone())
                .unwrap_or_default(),
            category: self.category(post.category_id).cloned(),
            location: self.location(post.location_id).cloned(),
            comment_count: self
                .comments
                .iter()
                .filter(|comment| comment.post_id == post.id)
                .count() as i64,
        }
    }

    fn filtered(&self, filter: &PostFilter) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|post| filter.author_id.is_none_or(|id| post.author_id == id))
            .filter(|post| {
                filter
                    .category_id
                    .is_none_or(|id| post.category_id == Some(id))
            })
            .filter(|post| {
                filter
                    .visibility
                    .admits(post, self.category(post.category_id))
            })
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        posts
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            posts: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
            categories: Arc::new(self.clone()),
            locations: Arc::new(self.clone()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store mutex poisoned")
    }

    pub(crate) fn add_user(&self, username: &str) -> User {
        let mut state = self.lock();
        let id = state.next_id();
        let profile = ProfileFields {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
        };
        let user = User::new(id, profile, Utc::now()).expect("test user must be valid");
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: String::new(),
        });
        user
    }

    pub(crate) fn add_category(&self, slug: &str, is_published: bool) -> Category {
        let mut state = self.lock();
        let id = state.next_id();
        let category = Category::new(id, slug, "", slug, is_published, Utc::now())
            .expect("test category must be valid");
        state.categories.push(category.clone());
        category
    }

    pub(crate) fn add_location(&self, name: &str) -> Location {
        let mut state = self.lock();
        let id = state.next_id();
        let location = Location {
            id,
            name: name.to_string(),
            is_published: true,
            created_at: Utc::now(),
        };
        state.locations.push(location.clone());
        location
    }

    /// Inserts a post published `hours_ago` hours in the past (negative means in the future).
    pub(crate) fn add_post(
        &self,
        author_id: i64,
        category_id: Option<i64>,
        is_published: bool,
        hours_ago: i64,
    ) -> Post {
        let mut state = self.lock();
        let id = state.next_id();
        let now = Utc::now();
        let fields = PostFields {
            title: format!("post {id}"),
            text: format!("text of post {id}"),
            image: None,
            pub_date: now - Duration::hours(hours_ago),
            is_published,
            category_id,
            location_id: None,
        };
        let post = Post::new(id, author_id, fields, now).expect("test post must be valid");
        state.posts.push(post.clone());
        post
    }

    pub(crate) fn add_comment(&self, post_id: i64, author_id: i64, text: &str) -> Comment {
        let mut state = self.lock();
        let id = state.next_id();
        let comment =
            Comment::new(id, text, post_id, author_id, Utc::now()).expect("test comment must be valid");
        state.comments.push(comment.clone());
        comment
    }

    pub(crate) fn post(&self, id: i64) -> Option<Post> {
        self.lock().posts.iter().find(|post| post.id == id).cloned()
    }

    pub(crate) fn comment(&self, id: i64) -> Option<Comment> {
        self.lock()
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned()
    }

    pub(crate) fn comments_of(&self, post_id: i64) -> Vec<Comment> {
        self.lock()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect()
    }

    pub(crate) fn user(&self, id: i64) -> Option<User> {
        self.lock().user(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|creds| creds.user.username == input.username)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        let id = state.next_id();
        let profile = ProfileFields {
            username: input.username,
            first_name: String::new(),
            last_name: String::new(),
            email: input.email,
        };
        let user = User::new(id, profile, Utc::now())?;
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|creds| creds.user.username == username)
            .cloned())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        profile: ProfileFields,
    ) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|creds| creds.user.id != id && creds.user.username == profile.username)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        let Some(creds) = state.users.iter_mut().find(|creds| creds.user.id == id) else {
            return Ok(None);
        };
        creds.user = User::new(id, profile, creds.user.created_at)?;
        Ok(Some(creds.user.clone()))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        if state.user(input.author_id).is_none() {
            return Err(DomainError::NotFound("author".to_string()));
        }
        state.check_references(&input.fields)?;
        let id = state.next_id();
        let post = Post::new(id, input.author_id, input.fields, Utc::now())?;
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post_item(&self, id: i64) -> Result<Option<PostListItem>, DomainError> {
        let state = self.lock();
        Ok(state
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| state.item(post)))
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostFields,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        state.check_references(&patch)?;
        let Some(post) = state
            .posts
            .iter_mut()
            .find(|post| post.id == post_id && post.author_id == owner_id)
        else {
            return Ok(None);
        };
        *post = Post::new(post.id, post.author_id, patch, post.created_at)?;
        Ok(Some(post.clone()))
    }

    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state
            .posts
            .retain(|post| !(post.id == post_id && post.author_id == owner_id));
        let deleted = state.posts.len() < before;
        if deleted {
            state.comments.retain(|comment| comment.post_id != post_id);
        }
        Ok(deleted)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostListItem>, DomainError> {
        let state = self.lock();
        Ok(state
            .filtered(&filter)
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .map(|post| state.item(post))
            .collect())
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError> {
        Ok(self.lock().filtered(&filter).len() as i64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|post| post.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        let id = state.next_id();
        let comment = Comment::new(id, input.text, input.post_id, input.author_id, Utc::now())?;
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .lock()
            .comments
            .iter()
            .find(|comment| comment.id == comment_id && comment.post_id == post_id)
            .cloned())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentItem>, DomainError> {
        let state = self.lock();
        let mut comments: Vec<&Comment> = state
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments
            .into_iter()
            .map(|comment| CommentItem {
                comment: comment.clone(),
                author_username: state
                    .user(comment.author_id)
                    .map(|user| user.username.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        let Some(comment) = state
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id && comment.author_id == owner_id)
        else {
            return Ok(None);
        };
        comment.text = text;
        Ok(Some(comment.clone()))
    }

    async fn delete_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.comments.len();
        state
            .comments
            .retain(|comment| !(comment.id == comment_id && comment.author_id == owner_id));
        Ok(state.comments.len() < before)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn get_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().category(Some(id)).cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|category| category.slug == slug && category.is_published)
            .cloned())
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn get_location(&self, id: i64) -> Result<Option<Location>, DomainError> {
        Ok(self.lock().location(Some(id)).cloned())
    }
}
