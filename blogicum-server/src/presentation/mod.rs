use std::sync::Arc;

use crate::application::Repositories;
use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::profile_service::ProfileService;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) blog_service: Arc<BlogService>,
    pub(crate) comment_service: Arc<CommentService>,
    pub(crate) profile_service: Arc<ProfileService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(repos: Repositories, jwt: Arc<JwtService>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(repos.users.clone(), jwt.clone())),
            blog_service: Arc::new(BlogService::new(
                repos.posts.clone(),
                repos.comments.clone(),
                repos.categories,
                repos.locations,
            )),
            comment_service: Arc::new(CommentService::new(repos.posts.clone(), repos.comments)),
            profile_service: Arc::new(ProfileService::new(repos.users, repos.posts)),
            jwt,
        }
    }
}
