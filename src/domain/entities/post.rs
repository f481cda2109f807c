use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::form::{not_blank, trim_in_place, FormField, ModelForm};
use crate::utils::markdown::safe_markdown_to_html;

const MAX_TITLE_LENGTH: u64 = 200;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub published_date: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.published_date.is_some()
    }

    /// Body rendered from Markdown and sanitized.
    pub fn text_html(&self) -> String {
        safe_markdown_to_html(&self.text)
    }

    pub fn to_form(&self) -> PostForm {
        PostForm {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            text: self.text.clone(),
        }
    }
}

/// A post plus the number of its approved comments, as shown on list cards.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostSummary {
    #[sqlx(flatten)]
    pub post: Post,
    pub approved_comments: i64,
}

#[derive(Debug, Clone)]
pub struct PostInsert {
    pub author_id: i64,
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

// ───── Forms ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_TITLE_LENGTH, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_TITLE_LENGTH, message = "Ensure this value has at most 200 characters.")
    )]
    pub subtitle: String,

    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

impl PostForm {
    pub fn prepare_for_insert(&self, author_id: i64) -> PostInsert {
        PostInsert {
            author_id,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            text: self.text.clone(),
            created_date: Utc::now(),
        }
    }
}

impl ModelForm for PostForm {
    const FIELDS: &'static [FormField] = &[
        FormField::text("title", "Title", "Post title"),
        FormField::text("subtitle", "Subtitle", "A one line summary"),
        FormField::textarea("text", "Text", "Write in Markdown"),
    ];

    fn values(&self) -> Vec<String> {
        vec![self.title.clone(), self.subtitle.clone(), self.text.clone()]
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.subtitle);
        trim_in_place(&mut self.text);
    }
}
