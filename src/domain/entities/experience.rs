use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::cv::{CvKind, CvResource};
use crate::entities::form::{not_blank, trim_in_place, FormField, ModelForm};
use crate::errors::AppError;
use crate::repositories::cv::{CvRepositories, CvRepository};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Experience {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub text: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct ExperienceForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub subtitle: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 50, message = "Ensure this value has at most 50 characters.")
    )]
    pub date: String,

    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

impl ModelForm for ExperienceForm {
    const FIELDS: &'static [FormField] = &[
        FormField::text("title", "Title", "Role"),
        FormField::text("subtitle", "Subtitle", "Company"),
        FormField::text("date", "Date", "e.g. Summer 2019"),
        FormField::textarea("text", "Text", "What you did"),
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.subtitle.clone(),
            self.date.clone(),
            self.text.clone(),
        ]
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.subtitle);
        trim_in_place(&mut self.date);
        trim_in_place(&mut self.text);
    }
}

impl CvResource for Experience {
    type Form = ExperienceForm;

    const KIND: CvKind = CvKind::Experience;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> ExperienceForm {
        ExperienceForm {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            date: self.date.clone(),
            text: self.text.clone(),
        }
    }

    fn from_form(id: i64, form: &ExperienceForm) -> Result<Self, AppError> {
        Ok(Experience {
            id,
            title: form.title.clone(),
            subtitle: form.subtitle.clone(),
            date: form.date.clone(),
            text: form.text.clone(),
        })
    }

    fn repository(repos: &CvRepositories) -> &dyn CvRepository<Self> {
        repos.experience.as_ref()
    }
}
