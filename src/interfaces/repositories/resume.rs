//! Resume-side repositories: skills, work experience, education.
//!
//! These tables are small and order-driven, so listing always sorts by
//! `display_order` with the newest entries first inside ties.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        education::{Education, EducationInsert, UpdateEducationRequest},
        experience::{UpdateWorkExperienceRequest, WorkExperience, WorkExperienceInsert},
        option_fields::OptionField,
        skill::{NewSkillRequest, Skill, UpdateSkillRequest},
    },
    errors::AppError,
    repositories::{blog_post::push_nullable_text, sqlx_repo::SqlxResumeRepo},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_skill(&self, skill: &NewSkillRequest) -> Result<Skill, AppError>;
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;
    async fn get_skill_by_id(&self, id: &Uuid) -> Result<Skill, AppError>;
    async fn update_skill(&self, id: &Uuid, patch: &UpdateSkillRequest) -> Result<Skill, AppError>;
    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create_experience(&self, entry: &WorkExperienceInsert) -> Result<WorkExperience, AppError>;
    async fn list_experience(&self) -> Result<Vec<WorkExperience>, AppError>;
    async fn get_experience_by_id(&self, id: &Uuid) -> Result<WorkExperience, AppError>;
    async fn update_experience(&self, id: &Uuid, patch: &UpdateWorkExperienceRequest) -> Result<WorkExperience, AppError>;
    async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EducationRepository: Send + Sync {
    async fn create_education(&self, entry: &EducationInsert) -> Result<Education, AppError>;
    async fn list_education(&self) -> Result<Vec<Education>, AppError>;
    async fn get_education_by_id(&self, id: &Uuid) -> Result<Education, AppError>;
    async fn update_education(&self, id: &Uuid, patch: &UpdateEducationRequest) -> Result<Education, AppError>;
    async fn delete_education(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxResumeRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxResumeRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxResumeRepo {
    async fn create_skill(&self, skill: &NewSkillRequest) -> Result<Skill, AppError> {
        let created = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name, category, proficiency, years_experience, display_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&skill.name)
        .bind(skill.category)
        .bind(skill.proficiency)
        .bind(skill.years_experience)
        .bind(skill.display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills WHERE deleted_at IS NULL ORDER BY display_order ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn get_skill_by_id(&self, id: &Uuid) -> Result<Skill, AppError> {
        let skill = sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(skill)
    }

    async fn update_skill(&self, id: &Uuid, patch: &UpdateSkillRequest) -> Result<Skill, AppError> {
        let mut builder = QueryBuilder::new("UPDATE skills SET updated_at = NOW()");

        if let OptionField::SetToValue(name) = &patch.name {
            builder.push(", name = ").push_bind(name);
        }
        if let OptionField::SetToValue(category) = &patch.category {
            builder.push(", category = ").push_bind(*category);
        }
        if let OptionField::SetToValue(proficiency) = &patch.proficiency {
            builder.push(", proficiency = ").push_bind(*proficiency);
        }
        match &patch.years_experience {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                builder.push(", years_experience = NULL");
            }
            OptionField::SetToValue(years) => {
                builder.push(", years_experience = ").push_bind(*years);
            }
        }
        if let OptionField::SetToValue(order) = &patch.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" AND deleted_at IS NULL RETURNING *");

        let skill = builder.build_query_as::<Skill>().fetch_one(&self.pool).await?;
        Ok(skill)
    }

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE skills SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Skill not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ExperienceRepository for SqlxResumeRepo {
    async fn create_experience(&self, entry: &WorkExperienceInsert) -> Result<WorkExperience, AppError> {
        let created = sqlx::query_as::<_, WorkExperience>(
            r#"
            INSERT INTO work_experience (
                company, position, location, description, start_date, end_date,
                is_current, display_order, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&entry.company)
        .bind(&entry.position)
        .bind(&entry.location)
        .bind(&entry.description)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.is_current)
        .bind(entry.display_order)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_experience(&self) -> Result<Vec<WorkExperience>, AppError> {
        let entries = sqlx::query_as::<_, WorkExperience>(
            "SELECT * FROM work_experience ORDER BY display_order ASC, start_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn get_experience_by_id(&self, id: &Uuid) -> Result<WorkExperience, AppError> {
        let entry = sqlx::query_as::<_, WorkExperience>("SELECT * FROM work_experience WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn update_experience(
        &self,
        id: &Uuid,
        patch: &UpdateWorkExperienceRequest,
    ) -> Result<WorkExperience, AppError> {
        let mut builder = QueryBuilder::new("UPDATE work_experience SET updated_at = NOW()");

        if let OptionField::SetToValue(company) = &patch.company {
            builder.push(", company = ").push_bind(company);
        }
        if let OptionField::SetToValue(position) = &patch.position {
            builder.push(", position = ").push_bind(position);
        }
        push_nullable_text(&mut builder, "location", &patch.location);
        push_nullable_text(&mut builder, "description", &patch.description);
        if let OptionField::SetToValue(start) = &patch.start_date {
            builder.push(", start_date = ").push_bind(*start);
        }
        match &patch.end_date {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                builder.push(", end_date = NULL");
            }
            OptionField::SetToValue(end) => {
                builder.push(", end_date = ").push_bind(*end);
            }
        }
        if let OptionField::SetToValue(is_current) = &patch.is_current {
            builder.push(", is_current = ").push_bind(*is_current);
        }
        if let OptionField::SetToValue(order) = &patch.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" RETURNING *");

        let entry = builder
            .build_query_as::<WorkExperience>()
            .fetch_one(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn delete_experience(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM work_experience WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Experience entry not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl EducationRepository for SqlxResumeRepo {
    async fn create_education(&self, entry: &EducationInsert) -> Result<Education, AppError> {
        let created = sqlx::query_as::<_, Education>(
            r#"
            INSERT INTO education (
                institution, degree, field_of_study, description, start_date, end_date,
                is_current, display_order, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&entry.institution)
        .bind(&entry.degree)
        .bind(&entry.field_of_study)
        .bind(&entry.description)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.is_current)
        .bind(entry.display_order)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_education(&self) -> Result<Vec<Education>, AppError> {
        let entries = sqlx::query_as::<_, Education>(
            "SELECT * FROM education ORDER BY display_order ASC, start_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn get_education_by_id(&self, id: &Uuid) -> Result<Education, AppError> {
        let entry = sqlx::query_as::<_, Education>("SELECT * FROM education WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn update_education(
        &self,
        id: &Uuid,
        patch: &UpdateEducationRequest,
    ) -> Result<Education, AppError> {
        let mut builder = QueryBuilder::new("UPDATE education SET updated_at = NOW()");

        if let OptionField::SetToValue(institution) = &patch.institution {
            builder.push(", institution = ").push_bind(institution);
        }
        if let OptionField::SetToValue(degree) = &patch.degree {
            builder.push(", degree = ").push_bind(degree);
        }
        push_nullable_text(&mut builder, "field_of_study", &patch.field_of_study);
        push_nullable_text(&mut builder, "description", &patch.description);
        if let OptionField::SetToValue(start) = &patch.start_date {
            builder.push(", start_date = ").push_bind(*start);
        }
        match &patch.end_date {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                builder.push(", end_date = NULL");
            }
            OptionField::SetToValue(end) => {
                builder.push(", end_date = ").push_bind(*end);
            }
        }
        if let OptionField::SetToValue(is_current) = &patch.is_current {
            builder.push(", is_current = ").push_bind(*is_current);
        }
        if let OptionField::SetToValue(order) = &patch.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" RETURNING *");

        let entry = builder
            .build_query_as::<Education>()
            .fetch_one(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn delete_education(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM education WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Education entry not found".into()));
        }
        Ok(())
    }
}
