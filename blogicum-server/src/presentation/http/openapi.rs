use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::app_error::ErrorBody;
use crate::presentation::http::handlers::auth::{
    AuthResponseDto, LoginDto, LoginFormDto, RegisterDto, UserDto,
};
use crate::presentation::http::handlers::comments::{CommentDto, CommentFormDto};
use crate::presentation::http::handlers::feeds::{
    CategoryDto, CategoryFeedDto, PostCardDto, PostPageDto,
};
use crate::presentation::http::handlers::posts::{PostDetailDto, PostFormDto};
use crate::presentation::http::handlers::profiles::{ProfileDto, ProfileFormDto, PublicUserDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login_form,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::feeds::index,
        crate::presentation::http::handlers::feeds::category_posts,
        crate::presentation::http::handlers::posts::post_detail,
        crate::presentation::http::handlers::posts::create_post_form,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::edit_post_form,
        crate::presentation::http::handlers::posts::edit_post,
        crate::presentation::http::handlers::posts::delete_post_confirm,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::comments::add_comment,
        crate::presentation::http::handlers::comments::edit_comment_form,
        crate::presentation::http::handlers::comments::edit_comment,
        crate::presentation::http::handlers::comments::delete_comment_confirm,
        crate::presentation::http::handlers::comments::delete_comment,
        crate::presentation::http::handlers::profiles::profile,
        crate::presentation::http::handlers::profiles::edit_profile_form,
        crate::presentation::http::handlers::profiles::edit_profile
    ),
    components(
        schemas(
            ErrorBody,
            RegisterDto,
            LoginDto,
            LoginFormDto,
            AuthResponseDto,
            UserDto,
            CategoryDto,
            PostCardDto,
            PostPageDto,
            CategoryFeedDto,
            PostFormDto,
            PostDetailDto,
            CommentDto,
            CommentFormDto,
            PublicUserDto,
            ProfileDto,
            ProfileFormDto
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "feeds", description = "Public post listings"),
        (name = "posts", description = "Post detail and authoring"),
        (name = "comments", description = "Comment authoring"),
        (name = "profiles", description = "User profiles")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
