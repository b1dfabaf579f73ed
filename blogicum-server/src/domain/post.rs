use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

const TITLE_MAX_LEN: usize = 256;
const IMAGE_MAX_LEN: usize = 255;

/// Fields a post author is allowed to set. Create and edit share this set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PostFields {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Raw post form as submitted; `pub_date` is still text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostForm {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

impl PostForm {
    /// Normalizes the form into [`PostFields`]. A missing `pub_date` means `now`.
    pub(crate) fn validate(self, now: DateTime<Utc>) -> Result<PostFields, DomainError> {
        let pub_date = match self.pub_date.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(raw) => parse_pub_date(raw)?,
        };
        let fields = PostFields {
            title: self.title,
            text: self.text,
            image: self.image,
            pub_date,
            is_published: self.is_published,
            category_id: self.category_id,
            location_id: self.location_id,
        };
        fields.normalize()
    }
}

impl PostFields {
    pub(crate) fn normalize(self) -> Result<Self, DomainError> {
        validate_reference("category_id", self.category_id)?;
        validate_reference("location_id", self.location_id)?;
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            image: normalize_image(self.image)?,
            ..self
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        author_id: i64,
        fields: PostFields,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let fields = fields.normalize()?;

        Ok(Self {
            id,
            author_id,
            title: fields.title,
            text: fields.text,
            image: fields.image,
            pub_date: fields.pub_date,
            is_published: fields.is_published,
            category_id: fields.category_id,
            location_id: fields.location_id,
            created_at,
        })
    }

    pub(crate) fn fields(&self) -> PostFields {
        PostFields {
            title: self.title.clone(),
            text: self.text.clone(),
            image: self.image.clone(),
            pub_date: self.pub_date,
            is_published: self.is_published,
            category_id: self.category_id,
            location_id: self.location_id,
        }
    }
}

/// Accepts RFC 3339 as well as the `datetime-local` shape (`YYYY-MM-DDTHH:MM[:SS]`, UTC).
pub(crate) fn parse_pub_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Ok(value.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            DomainError::validation("pub_date", "must be a date-time like 2024-05-01T12:30")
        })
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::validation(field, "must be > 0"));
    }
    Ok(())
}

fn validate_reference(field: &'static str, value: Option<i64>) -> Result<(), DomainError> {
    match value {
        Some(id) => validate_positive_i64(field, id),
        None => Ok(()),
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation("title", "must be 1..256 chars"));
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::validation("text", "must not be empty"));
    }
    Ok(text.to_string())
}

fn normalize_image(image: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(image) = image else {
        return Ok(None);
    };
    let image = image.trim();
    if image.is_empty() {
        return Ok(None);
    }
    if image.chars().count() > IMAGE_MAX_LEN {
        return Err(DomainError::validation("image", "must be at most 255 chars"));
    }
    Ok(Some(image.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{DomainError, Post, PostFields, PostForm, parse_pub_date};

    fn form(title: &str, text: &str) -> PostForm {
        PostForm {
            title: title.to_string(),
            text: text.to_string(),
            image: None,
            pub_date: None,
            is_published: true,
            category_id: Some(1),
            location_id: None,
        }
    }

    #[test]
    fn post_form_validate_rejects_empty_title() {
        let err = form("   ", "valid text")
            .validate(Utc::now())
            .expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn post_form_validate_rejects_empty_text() {
        let err = form("valid title", "  ")
            .validate(Utc::now())
            .expect_err("text must be rejected");
        assert_validation_field(err, "text");
    }

    #[test]
    fn post_form_validate_rejects_long_title() {
        let err = form(&"t".repeat(257), "text")
            .validate(Utc::now())
            .expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn post_form_validate_normalizes_fields() {
        let now = Utc::now();
        let mut raw = form("  title  ", "  text  ");
        raw.image = Some("   ".to_string());

        let fields = raw.validate(now).expect("must validate");
        assert_eq!(fields.title, "title");
        assert_eq!(fields.text, "text");
        assert_eq!(fields.image, None);
        assert_eq!(fields.pub_date, now);
    }

    #[test]
    fn post_form_validate_rejects_bad_pub_date() {
        let mut raw = form("title", "text");
        raw.pub_date = Some("yesterday".to_string());

        let err = raw.validate(Utc::now()).expect_err("date must be rejected");
        assert_validation_field(err, "pub_date");
    }

    #[test]
    fn post_form_validate_rejects_non_positive_category() {
        let mut raw = form("title", "text");
        raw.category_id = Some(0);

        let err = raw.validate(Utc::now()).expect_err("category must be rejected");
        assert_validation_field(err, "category_id");
    }

    #[test]
    fn parse_pub_date_accepts_supported_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_pub_date("2024-05-01T12:30").unwrap(), expected);
        assert_eq!(parse_pub_date("2024-05-01T12:30:00").unwrap(), expected);
        assert_eq!(parse_pub_date("2024-05-01T15:30:00+03:00").unwrap(), expected);
        assert_eq!(parse_pub_date("2024-05-01 12:30").unwrap(), expected);
    }

    #[test]
    fn post_new_rejects_non_positive_author_id() {
        let now = Utc::now();
        let fields = form("Title", "Text").validate(now).unwrap();
        let err = Post::new(1, 0, fields, now).expect_err("author_id must be > 0");
        assert_validation_field(err, "author_id");
    }

    #[test]
    fn post_fields_round_trip_through_post() {
        let now = Utc::now();
        let fields = PostFields {
            title: "Title".to_string(),
            text: "Text".to_string(),
            image: Some("posts/cat.png".to_string()),
            pub_date: now - Duration::hours(1),
            is_published: false,
            category_id: Some(3),
            location_id: Some(4),
        };

        let post = Post::new(7, 10, fields.clone(), now).expect("post should be created");
        assert_eq!(post.fields(), fields);
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
