use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::cv::{CvKind, CvResource};
use crate::entities::form::{not_blank, trim_in_place, FormField, ModelForm};
use crate::errors::AppError;
use crate::repositories::cv::{CvRepositories, CvRepository};

const MAX_TEXT_LENGTH: u64 = 200;
const MAX_DATE_LENGTH: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Education {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub brief_text: String,
    pub detailed_text: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct EducationForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_TEXT_LENGTH, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_TEXT_LENGTH, message = "Ensure this value has at most 200 characters.")
    )]
    pub location: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_DATE_LENGTH, message = "Ensure this value has at most 20 characters.")
    )]
    pub start_date: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_DATE_LENGTH, message = "Ensure this value has at most 20 characters.")
    )]
    pub end_date: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_TEXT_LENGTH, message = "Ensure this value has at most 200 characters.")
    )]
    pub brief_text: String,

    #[validate(custom(function = "not_blank"))]
    pub detailed_text: String,
}

impl ModelForm for EducationForm {
    const FIELDS: &'static [FormField] = &[
        FormField::text("title", "Title", "Qualification"),
        FormField::text("location", "Location", "School or university"),
        FormField::text("start_date", "Start date", "e.g. Sep 2017"),
        FormField::text("end_date", "End date", "e.g. Jun 2021"),
        FormField::text("brief_text", "Brief text", "Grades at a glance"),
        FormField::textarea("detailed_text", "Detailed text", "Modules, projects, results"),
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.location.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.brief_text.clone(),
            self.detailed_text.clone(),
        ]
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.location);
        trim_in_place(&mut self.start_date);
        trim_in_place(&mut self.end_date);
        trim_in_place(&mut self.brief_text);
        trim_in_place(&mut self.detailed_text);
    }
}

impl CvResource for Education {
    type Form = EducationForm;

    const KIND: CvKind = CvKind::Education;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> EducationForm {
        EducationForm {
            title: self.title.clone(),
            location: self.location.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            brief_text: self.brief_text.clone(),
            detailed_text: self.detailed_text.clone(),
        }
    }

    fn from_form(id: i64, form: &EducationForm) -> Result<Self, AppError> {
        Ok(Education {
            id,
            title: form.title.clone(),
            location: form.location.clone(),
            start_date: form.start_date.clone(),
            end_date: form.end_date.clone(),
            brief_text: form.brief_text.clone(),
            detailed_text: form.detailed_text.clone(),
        })
    }

    fn repository(repos: &CvRepositories) -> &dyn CvRepository<Self> {
        repos.education.as_ref()
    }
}
