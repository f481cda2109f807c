use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::cv::{CvKind, CvResource};
use crate::entities::form::{not_blank, trim_in_place, FormField, ModelForm};
use crate::errors::AppError;
use crate::repositories::cv::{CvRepositories, CvRepository};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Interest {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct InterestForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
}

impl ModelForm for InterestForm {
    const FIELDS: &'static [FormField] = &[FormField::text("title", "Title", "Interest")];

    fn values(&self) -> Vec<String> {
        vec![self.title.clone()]
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
    }
}

impl CvResource for Interest {
    type Form = InterestForm;

    const KIND: CvKind = CvKind::Interest;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> InterestForm {
        InterestForm { title: self.title.clone() }
    }

    fn from_form(id: i64, form: &InterestForm) -> Result<Self, AppError> {
        Ok(Interest { id, title: form.title.clone() })
    }

    fn repository(repos: &CvRepositories) -> &dyn CvRepository<Self> {
        repos.interest.as_ref()
    }
}
