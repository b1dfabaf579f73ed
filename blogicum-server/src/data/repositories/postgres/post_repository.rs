use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostListItem, PostRepository};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostFields};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = r#"
    id, author_id, title, text, image, pub_date, is_published, category_id, location_id, created_at
"#;

const POST_ITEM_SELECT: &str = r#"
    SELECT
        p.id,
        p.author_id,
        p.title,
        p.text,
        p.image,
        p.pub_date,
        p.is_published,
        p.category_id,
        p.location_id,
        p.created_at,
        u.username AS author_username,
        c.title AS category_title,
        c.description AS category_description,
        c.slug AS category_slug,
        c.is_published AS category_is_published,
        c.created_at AS category_created_at,
        l.name AS location_name,
        l.is_published AS location_is_published,
        l.created_at AS location_created_at,
        (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

// $1 author, $2 category, $3 publication cut-off (NULL disables the visibility filter)
const POST_FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR p.author_id = $1)
      AND ($2::BIGINT IS NULL OR p.category_id = $2)
      AND (
        $3::TIMESTAMPTZ IS NULL
        OR (p.is_published AND p.pub_date <= $3 AND c.is_published IS TRUE)
      )
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    title: String,
    text: String,
    image: Option<String>,
    pub_date: DateTime<Utc>,
    is_published: bool,
    category_id: Option<i64>,
    location_id: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostItemRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_username: String,
    category_title: Option<String>,
    category_description: Option<String>,
    category_slug: Option<String>,
    category_is_published: Option<bool>,
    category_created_at: Option<DateTime<Utc>>,
    location_name: Option<String>,
    location_is_published: Option<bool>,
    location_created_at: Option<DateTime<Utc>>,
    comment_count: i64,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO posts
                (author_id, title, text, image, pub_date, is_published, category_id, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {POST_COLUMNS}
            "#
        );
        let fields = input.fields;
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(input.author_id)
            .bind(fields.title)
            .bind(fields.text)
            .bind(fields.image)
            .bind(fields.pub_date)
            .bind(fields.is_published)
            .bind(fields.category_id)
            .bind(fields.location_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post_item(&self, id: i64) -> Result<Option<PostListItem>, DomainError> {
        let sql = format!("{POST_ITEM_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_item).transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostFields,
    ) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            r#"
            UPDATE posts
            SET title = $3,
                text = $4,
                image = $5,
                pub_date = $6,
                is_published = $7,
                category_id = $8,
                location_id = $9
            WHERE id = $1 AND author_id = $2
            RETURNING {POST_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .bind(owner_id)
            .bind(patch.title)
            .bind(patch.text)
            .bind(patch.image)
            .bind(patch.pub_date)
            .bind(patch.is_published)
            .bind(patch.category_id)
            .bind(patch.location_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostListItem>, DomainError> {
        let sql = format!(
            r#"
            {POST_ITEM_SELECT}
            {POST_FILTER}
            ORDER BY p.pub_date DESC, p.id DESC
            LIMIT $4
            OFFSET $5
            "#
        );
        let rows = sqlx::query_as::<_, PostItemRow>(&sql)
            .bind(filter.author_id)
            .bind(filter.category_id)
            .bind(filter.visibility.published_before())
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_item).collect()
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM posts p
            LEFT JOIN categories c ON c.id = p.category_id
            {POST_FILTER}
            "#
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.author_id)
            .bind(filter.category_id)
            .bind(filter.visibility.published_before())
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(count)
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    let fields = PostFields {
        title: row.title,
        text: row.text,
        image: row.image,
        pub_date: row.pub_date,
        is_published: row.is_published,
        category_id: row.category_id,
        location_id: row.location_id,
    };
    Post::new(row.id, row.author_id, fields, row.created_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_row_to_item(row: PostItemRow) -> Result<PostListItem, DomainError> {
    let category = match (
        row.post.category_id,
        row.category_title,
        row.category_description,
        row.category_slug,
        row.category_is_published,
        row.category_created_at,
    ) {
        (Some(id), Some(title), Some(description), Some(slug), Some(is_published), Some(created_at)) => {
            Some(
                Category::new(id, title, description, slug, is_published, created_at)
                    .map_err(|err| DomainError::Unexpected(err.to_string()))?,
            )
        }
        _ => None,
    };

    let location = match (
        row.post.location_id,
        row.location_name,
        row.location_is_published,
        row.location_created_at,
    ) {
        (Some(id), Some(name), Some(is_published), Some(created_at)) => Some(Location {
            id,
            name,
            is_published,
            created_at,
        }),
        _ => None,
    };

    Ok(PostListItem {
        post: map_row_to_post(row.post)?,
        author_username: row.author_username,
        category,
        location,
        comment_count: row.comment_count,
    })
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return match db_err.constraint() {
            Some("posts_category_id_fkey") => {
                DomainError::validation("category_id", "unknown category")
            }
            Some("posts_location_id_fkey") => {
                DomainError::validation("location_id", "unknown location")
            }
            _ => DomainError::NotFound("author".to_string()),
        };
    }
    DomainError::Unexpected(err.to_string())
}
