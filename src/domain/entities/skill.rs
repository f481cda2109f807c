use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::cv::{CvKind, CvResource};
use crate::entities::form::{not_blank, trim_in_place, FormField, ModelForm};
use crate::errors::{AppError, FieldError};
use crate::repositories::cv::{CvRepositories, CvRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    #[default]
    Technical,
    Other,
}

impl SkillType {
    pub const CHOICES: &'static [(&'static str, &'static str)] =
        &[("technical", "Technical"), ("other", "Other")];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::Technical => "technical",
            SkillType::Other => "other",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSkillType(pub String);

impl fmt::Display for UnknownSkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown skill type `{}`", self.0)
    }
}

impl std::error::Error for UnknownSkillType {}

impl TryFrom<String> for SkillType {
    type Error = UnknownSkillType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "technical" => Ok(SkillType::Technical),
            "other" => Ok(SkillType::Other),
            _ => Err(UnknownSkillType(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub skill_type: SkillType,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct SkillForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,

    #[validate(custom(function = "validate_skill_type"))]
    pub skill_type: String,
}

fn validate_skill_type(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if SkillType::try_from(value.to_string()).is_err() {
        let mut error = ValidationError::new("invalid_choice");
        error.message = Some(
            format!("Select a valid choice. {} is not one of the available choices.", value).into(),
        );
        return Err(error);
    }
    Ok(())
}

impl ModelForm for SkillForm {
    const FIELDS: &'static [FormField] = &[
        FormField::text("title", "Title", "Skill"),
        FormField::select("skill_type", "Skill type", SkillType::CHOICES),
    ];

    fn values(&self) -> Vec<String> {
        vec![self.title.clone(), self.skill_type.clone()]
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.skill_type);
    }
}

impl CvResource for Skill {
    type Form = SkillForm;

    const KIND: CvKind = CvKind::Skill;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> SkillForm {
        SkillForm {
            title: self.title.clone(),
            skill_type: self.skill_type.as_str().to_string(),
        }
    }

    fn from_form(id: i64, form: &SkillForm) -> Result<Self, AppError> {
        let skill_type = SkillType::try_from(form.skill_type.clone()).map_err(|e| {
            AppError::ValidationError(vec![FieldError {
                field: "skill_type".into(),
                message: e.to_string(),
            }])
        })?;

        Ok(Skill {
            id,
            title: form.title.clone(),
            skill_type,
        })
    }

    fn initial_form() -> SkillForm {
        SkillForm {
            title: String::new(),
            skill_type: SkillType::default().as_str().to_string(),
        }
    }

    fn repository(repos: &CvRepositories) -> &dyn CvRepository<Self> {
        repos.skill.as_ref()
    }
}
