use std::fmt::Debug;

use sqlx::{postgres::PgRow, FromRow};

use crate::entities::form::ModelForm;
use crate::errors::AppError;
use crate::repositories::cv::{CvRepositories, CvRepository};

/// The four record types that make up the CV page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CvKind {
    Education,
    Skill,
    Experience,
    Interest,
}

impl CvKind {
    pub const ALL: [CvKind; 4] = [CvKind::Education, CvKind::Skill, CvKind::Experience, CvKind::Interest];

    /// URL segment under `/cv/`.
    pub const fn slug(self) -> &'static str {
        match self {
            CvKind::Education => "education",
            CvKind::Skill => "skill",
            CvKind::Experience => "experience",
            CvKind::Interest => "interest",
        }
    }

    pub const fn table(self) -> &'static str {
        match self {
            CvKind::Education => "cv_education",
            CvKind::Skill => "cv_skill",
            CvKind::Experience => "cv_experience",
            CvKind::Interest => "cv_interest",
        }
    }

    pub const fn heading(self) -> &'static str {
        match self {
            CvKind::Education => "Education",
            CvKind::Skill => "Skill",
            CvKind::Experience => "Experience",
            CvKind::Interest => "Interest",
        }
    }

    /// Name of the edit page, shared by the new and edit views.
    pub fn template(self) -> String {
        format!("cv/{}_edit.html", self.slug())
    }
}

/// A CV record type that can be listed, created, edited and removed
/// through the generic repository and handlers.
///
/// The column names are the `FIELDS` names of the bound form, and every
/// column is stored as text.
pub trait CvResource: for<'r> FromRow<'r, PgRow> + Clone + Debug + Send + Sync + Unpin + 'static {
    type Form: ModelForm;

    const KIND: CvKind;

    fn id(&self) -> i64;

    fn to_form(&self) -> Self::Form;

    /// Builds a record from an already validated form.
    fn from_form(id: i64, form: &Self::Form) -> Result<Self, AppError>;

    /// Values shown by a blank "new" page.
    fn initial_form() -> Self::Form {
        Self::Form::default()
    }

    fn repository(repos: &CvRepositories) -> &dyn CvRepository<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_routes_and_tables() {
        let slugs: std::collections::HashSet<_> = CvKind::ALL.iter().map(|k| k.slug()).collect();
        let tables: std::collections::HashSet<_> = CvKind::ALL.iter().map(|k| k.table()).collect();
        assert_eq!(slugs.len(), 4);
        assert_eq!(tables.len(), 4);
    }

    #[test]
    fn template_name_uses_slug() {
        assert_eq!(CvKind::Education.template(), "cv/education_edit.html");
        assert_eq!(CvKind::Skill.template(), "cv/skill_edit.html");
    }
}
