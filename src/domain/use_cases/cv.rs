use validator::Validate;

use crate::{
    entities::{
        cv::CvResource,
        education::Education,
        experience::Experience,
        form::ModelForm,
        interest::Interest,
        skill::{Skill, SkillType},
    },
    errors::AppError,
    repositories::cv::CvRepositories,
};

/// Everything the CV page shows.
#[derive(Debug, Clone, Default)]
pub struct CvOverview {
    pub technical_skills: Vec<Skill>,
    pub other_skills: Vec<Skill>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub interests: Vec<Interest>,
}

#[derive(Clone)]
pub struct CvHandler {
    pub repos: CvRepositories,
}

impl CvHandler {
    pub fn new(repos: CvRepositories) -> Self {
        CvHandler { repos }
    }

    /// Loads every section of the CV, with skills split by type
    pub async fn overview(&self) -> Result<CvOverview, AppError> {
        let technical_skills = self.repos.skill.list_where("skill_type", SkillType::Technical.as_str()).await?;
        let other_skills = self.repos.skill.list_where("skill_type", SkillType::Other.as_str()).await?;

        Ok(CvOverview {
            technical_skills,
            other_skills,
            education: self.repos.education.list().await?,
            experience: self.repos.experience.list().await?,
            interests: self.repos.interest.list().await?,
        })
    }

    pub async fn get<E: CvResource>(&self, id: i64) -> Result<E, AppError> {
        E::repository(&self.repos).get(id).await
    }

    /// Validates and stores a new record
    pub async fn create<E: CvResource>(&self, mut form: E::Form) -> Result<E, AppError> {
        form.normalize();
        form.validate()?;

        let record = E::repository(&self.repos).create(&form).await?;
        tracing::info!(kind = E::KIND.slug(), id = record.id(), "CV entry created");
        Ok(record)
    }

    /// Replaces every field of an existing record
    pub async fn update<E: CvResource>(&self, id: i64, mut form: E::Form) -> Result<E, AppError> {
        let repo = E::repository(&self.repos);
        repo.get(id).await?;

        form.normalize();
        form.validate()?;

        repo.update(id, &form).await
    }

    pub async fn remove<E: CvResource>(&self, id: i64) -> Result<(), AppError> {
        E::repository(&self.repos).delete(id).await?;
        tracing::info!(kind = E::KIND.slug(), id, "CV entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entities::{education::EducationForm, skill::SkillForm};
    use crate::repositories::memory::MemoryStore;

    fn handler() -> CvHandler {
        let store = Arc::new(MemoryStore::new());
        CvHandler::new(CvRepositories {
            education: store.clone(),
            skill: store.clone(),
            experience: store.clone(),
            interest: store,
        })
    }

    fn skill(title: &str, kind: &str) -> SkillForm {
        SkillForm { title: title.into(), skill_type: kind.into() }
    }

    #[tokio::test]
    async fn overview_splits_skills_by_type() {
        let cv = handler();
        cv.create::<Skill>(skill("Rust", "technical")).await.unwrap();
        cv.create::<Skill>(skill("Climbing", "other")).await.unwrap();
        cv.create::<Skill>(skill("Postgres", "technical")).await.unwrap();

        let overview = cv.overview().await.unwrap();
        assert_eq!(overview.technical_skills.len(), 2);
        assert_eq!(overview.other_skills.len(), 1);
        assert_eq!(overview.other_skills[0].title, "Climbing");
    }

    #[tokio::test]
    async fn skill_without_type_is_not_saved() {
        let cv = handler();
        let err = cv.create::<Skill>(skill("Rust", "")).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(cv.overview().await.unwrap().technical_skills.is_empty());
    }

    #[tokio::test]
    async fn education_with_blank_dates_is_not_saved() {
        let cv = handler();
        let form = EducationForm {
            title: "BSc".into(),
            location: "Birmingham".into(),
            start_date: "".into(),
            end_date: " ".into(),
            brief_text: "First".into(),
            detailed_text: "Modules".into(),
        };

        let AppError::ValidationError(fields) = cv.create::<Education>(form).await.unwrap_err() else {
            panic!("expected a validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["end_date", "start_date"]);
        assert!(cv.overview().await.unwrap().education.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let cv = handler();
        let created = cv.create::<Skill>(skill("Rust", "technical")).await.unwrap();

        let updated = cv.update::<Skill>(created.id, skill("Guitar", "other")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.skill_type, SkillType::Other);
        assert_eq!(cv.get::<Skill>(created.id).await.unwrap().title, "Guitar");
    }

    #[tokio::test]
    async fn remove_missing_record_is_not_found() {
        let cv = handler();
        assert!(matches!(cv.remove::<Interest>(3).await, Err(AppError::NotFound(_))));
    }
}
