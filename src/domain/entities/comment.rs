use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::form::{not_blank, trim_in_place, FormField, ModelForm};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub approved_comment: bool,
}

/// New comments always start unapproved; there is no field to say otherwise.
#[derive(Debug, Clone)]
pub struct CommentInsert {
    pub post_id: i64,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub author: String,

    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

impl CommentForm {
    pub fn prepare_for_insert(&self, post_id: i64) -> CommentInsert {
        CommentInsert {
            post_id,
            author: self.author.clone(),
            text: self.text.clone(),
            created_date: Utc::now(),
        }
    }
}

impl ModelForm for CommentForm {
    const FIELDS: &'static [FormField] = &[
        FormField::text("author", "Author", "Your name"),
        FormField::textarea("text", "Text", "Say something nice"),
    ];

    fn values(&self) -> Vec<String> {
        vec![self.author.clone(), self.text.clone()]
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.text);
    }
}
