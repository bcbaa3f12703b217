//! Resume section: skills, work experience, education.
//!
//! One handler covers all three because the admin edits them on a single
//! screen and the cross-field date rules are shared between experience and
//! education.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::navigation::AdminSection,
    entities::{
        education::{Education, EducationInsert, NewEducationRequest, UpdateEducationRequest},
        experience::{
            NewWorkExperienceRequest, UpdateWorkExperienceRequest, WorkExperience,
            WorkExperienceInsert,
        },
        skill::{NewSkillRequest, Skill, UpdateSkillRequest},
    },
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::resume::{EducationRepository, ExperienceRepository, SkillRepository},
};

pub struct ResumeHandler<R>
where
    R: SkillRepository + ExperienceRepository + EducationRepository,
{
    pub resume_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> ResumeHandler<R>
where
    R: SkillRepository + ExperienceRepository + EducationRepository,
{
    pub fn new(resume_repo: R, cache: Arc<CollectionCache>) -> Self {
        ResumeHandler { resume_repo, cache }
    }

    // ───── Skills ───────────────────────────────────────────────────

    pub async fn create_skill(&self, request: NewSkillRequest) -> Result<Skill, AppError> {
        request.validate()?;

        let skill = self.resume_repo.create_skill(&request).await?;
        self.cache.invalidate_section(AdminSection::Skills);
        Ok(skill)
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.resume_repo.list_skills().await
    }

    pub async fn update_skill(
        &self,
        id: &Uuid,
        patch: &UpdateSkillRequest,
    ) -> Result<Skill, AppError> {
        patch.validate()?;

        let skill = self.resume_repo.update_skill(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Skills);
        Ok(skill)
    }

    pub async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        self.resume_repo.delete_skill(id).await?;
        self.cache.invalidate_section(AdminSection::Skills);
        Ok(())
    }

    // ───── Work experience ──────────────────────────────────────────

    pub async fn create_experience(
        &self,
        request: NewWorkExperienceRequest,
    ) -> Result<WorkExperience, AppError> {
        let insert = WorkExperienceInsert::try_from(request)?;

        let entry = self.resume_repo.create_experience(&insert).await?;
        self.cache.invalidate_section(AdminSection::Experience);
        Ok(entry)
    }

    pub async fn list_experience(&self) -> Result<Vec<WorkExperience>, AppError> {
        self.resume_repo.list_experience().await
    }

    /// Patches are validated against the stored row so the date rules see
    /// merged values, not the sparse patch.
    pub async fn update_experience(
        &self,
        id: &Uuid,
        patch: &UpdateWorkExperienceRequest,
    ) -> Result<WorkExperience, AppError> {
        let current = self.resume_repo.get_experience_by_id(id).await?;
        patch.validate_against(&current)?;

        let entry = self.resume_repo.update_experience(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Experience);
        Ok(entry)
    }

    pub async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError> {
        self.resume_repo.delete_experience(id).await?;
        self.cache.invalidate_section(AdminSection::Experience);
        Ok(())
    }

    // ───── Education ────────────────────────────────────────────────

    pub async fn create_education(
        &self,
        request: NewEducationRequest,
    ) -> Result<Education, AppError> {
        let insert = EducationInsert::try_from(request)?;

        let entry = self.resume_repo.create_education(&insert).await?;
        self.cache.invalidate_section(AdminSection::Education);
        Ok(entry)
    }

    pub async fn list_education(&self) -> Result<Vec<Education>, AppError> {
        self.resume_repo.list_education().await
    }

    pub async fn update_education(
        &self,
        id: &Uuid,
        patch: &UpdateEducationRequest,
    ) -> Result<Education, AppError> {
        let current = self.resume_repo.get_education_by_id(id).await?;
        patch.validate_against(&current)?;

        let entry = self.resume_repo.update_education(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Education);
        Ok(entry)
    }

    pub async fn delete_education(&self, id: &Uuid) -> Result<(), AppError> {
        self.resume_repo.delete_education(id).await?;
        self.cache.invalidate_section(AdminSection::Education);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::option_fields::OptionField;
    use chrono::Utc;
    use mockall::mock;

    // One struct implements all three traits in production, so the mock
    // mirrors that shape.
    mock! {
        ResumeRepo {}

        #[async_trait::async_trait]
        impl SkillRepository for ResumeRepo {
            async fn create_skill(&self, skill: &NewSkillRequest) -> Result<Skill, AppError>;
            async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;
            async fn get_skill_by_id(&self, id: &Uuid) -> Result<Skill, AppError>;
            async fn update_skill(&self, id: &Uuid, patch: &UpdateSkillRequest) -> Result<Skill, AppError>;
            async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError>;
        }

        #[async_trait::async_trait]
        impl ExperienceRepository for ResumeRepo {
            async fn create_experience(&self, entry: &WorkExperienceInsert) -> Result<WorkExperience, AppError>;
            async fn list_experience(&self) -> Result<Vec<WorkExperience>, AppError>;
            async fn get_experience_by_id(&self, id: &Uuid) -> Result<WorkExperience, AppError>;
            async fn update_experience(&self, id: &Uuid, patch: &UpdateWorkExperienceRequest) -> Result<WorkExperience, AppError>;
            async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError>;
        }

        #[async_trait::async_trait]
        impl EducationRepository for ResumeRepo {
            async fn create_education(&self, entry: &EducationInsert) -> Result<Education, AppError>;
            async fn list_education(&self) -> Result<Vec<Education>, AppError>;
            async fn get_education_by_id(&self, id: &Uuid) -> Result<Education, AppError>;
            async fn update_education(&self, id: &Uuid, patch: &UpdateEducationRequest) -> Result<Education, AppError>;
            async fn delete_education(&self, id: &Uuid) -> Result<(), AppError>;
        }
    }

    fn handler(repo: MockResumeRepo) -> ResumeHandler<MockResumeRepo> {
        ResumeHandler::new(repo, Arc::new(CollectionCache::new()))
    }

    fn stored_experience() -> WorkExperience {
        let now = Utc::now();
        WorkExperience {
            id: Uuid::new_v4(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: None,
            description: None,
            start_date: "2020-03-01".parse().unwrap(),
            end_date: Some("2022-03-01".parse().unwrap()),
            is_current: false,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_experience_without_end_date_is_rejected_before_the_repository() {
        let mut repo = MockResumeRepo::new();
        repo.expect_create_experience().times(0);

        let request = NewWorkExperienceRequest {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: None,
            description: None,
            start_date: "2020-03-01".parse().unwrap(),
            end_date: None,
            is_current: false,
            display_order: 0,
        };
        let result = handler(repo).create_experience(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn clearing_end_date_on_non_current_row_is_rejected() {
        let current = stored_experience();
        let mut repo = MockResumeRepo::new();
        repo.expect_get_experience_by_id()
            .returning(move |_| Ok(current.clone()));
        repo.expect_update_experience().times(0);

        let patch = UpdateWorkExperienceRequest {
            end_date: OptionField::SetToNull,
            ..Default::default()
        };
        let result = handler(repo)
            .update_experience(&Uuid::new_v4(), &patch)
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn marking_current_allows_clearing_end_date() {
        let current = stored_experience();
        let updated = WorkExperience {
            end_date: None,
            is_current: true,
            ..current.clone()
        };

        let mut repo = MockResumeRepo::new();
        repo.expect_get_experience_by_id()
            .returning(move |_| Ok(current.clone()));
        repo.expect_update_experience()
            .times(1)
            .returning(move |_, _| Ok(updated.clone()));

        let patch = UpdateWorkExperienceRequest {
            end_date: OptionField::SetToNull,
            is_current: OptionField::SetToValue(true),
            ..Default::default()
        };
        let entry = handler(repo)
            .update_experience(&Uuid::new_v4(), &patch)
            .await
            .unwrap();
        assert!(entry.is_current);
        assert!(entry.end_date.is_none());
    }

    #[tokio::test]
    async fn skill_mutation_invalidates_skills_collections() {
        let cache = Arc::new(CollectionCache::new());
        cache.insert(AdminSection::Skills, "all", &serde_json::json!([]));

        let mut repo = MockResumeRepo::new();
        repo.expect_delete_skill().returning(|_| Ok(()));

        let handler = ResumeHandler::new(repo, cache.clone());
        handler.delete_skill(&Uuid::new_v4()).await.unwrap();

        assert!(cache.get(AdminSection::Skills, "all").is_none());
    }
}
