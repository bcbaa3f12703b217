use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::{
    domain::{ordering::is_permutation_of, slug::resolve_slug_for_rename},
    entities::{
        content_status::ContentStatus,
        option_fields::OptionField,
        project::{Project, ProjectImage, ProjectInsert, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::{
        blog_post::{page_offset, push_nullable_text},
        sqlx_repo::SqlxProjectRepo,
    },
};

#[derive(Debug, Default, Clone)]
pub struct ProjectListFilter {
    pub query: Option<String>,
    pub status: Option<ContentStatus>,
    pub technology: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

// The caption parameter is owned: mockall cannot name the elided
// lifetime inside `Option<&str>` when generating the mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Uuid, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn list_projects(&self, filter: &ProjectListFilter) -> Result<Vec<Project>, AppError>;
    async fn count_projects(&self, filter: &ProjectListFilter) -> Result<i64, AppError>;
    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError>;
    async fn set_project_status(&self, id: &Uuid, status: ContentStatus) -> Result<Project, AppError>;
    async fn soft_delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn purge_soft_deleted(&self, older_than_days: i64) -> Result<u64, AppError>;

    async fn list_images(&self, project_id: &Uuid) -> Result<Vec<ProjectImage>, AppError>;
    /// First gallery image per project, for list-row covers.
    async fn cover_images(&self, project_ids: &[Uuid]) -> Result<Vec<ProjectImage>, AppError>;
    async fn attach_image(
        &self,
        project_id: &Uuid,
        media_id: &Uuid,
        url: &str,
        alt_text: &str,
        caption: Option<String>,
    ) -> Result<Vec<ProjectImage>, AppError>;
    async fn remove_image(&self, project_id: &Uuid, image_id: &Uuid) -> Result<Vec<ProjectImage>, AppError>;
    async fn reorder_images(&self, project_id: &Uuid, ordered_ids: &[Uuid]) -> Result<Vec<ProjectImage>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_list_predicates<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a ProjectListFilter) {
    if let Some(query) = &filter.query {
        builder.push(" AND (title ILIKE ").push_bind(format!("%{}%", query));
        builder.push(" OR summary ILIKE ").push_bind(format!("%{}%", query));
        builder.push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(technology) = &filter.technology {
        builder.push(" AND technologies @> ").push_bind(vec![technology.clone()]);
    }
}

/// Rewrite display_order as the dense sequence 0..n-1 over the gallery's
/// current row order. Runs inside the caller's transaction.
async fn renumber_gallery(
    tx: &mut Transaction<'_, Postgres>,
    project_id: &Uuid,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE project_images pi SET display_order = ranked.rank
        FROM (
            SELECT id, ROW_NUMBER() OVER (ORDER BY display_order ASC, created_at ASC) - 1 AS rank
            FROM project_images
            WHERE project_id = $1
        ) ranked
        WHERE pi.id = ranked.id AND pi.display_order <> ranked.rank
        "#,
    )
    .bind(project_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn fetch_gallery(pool: &PgPool, project_id: &Uuid) -> Result<Vec<ProjectImage>, AppError> {
    let images = sqlx::query_as::<_, ProjectImage>(
        "SELECT * FROM project_images WHERE project_id = $1 ORDER BY display_order ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO projects (
                title, slug, summary, content_markdown, technologies, github_url,
                live_url, status, display_order, published_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.summary)
        .bind(&project.content_markdown)
        .bind(&project.technologies)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(project.status)
        .bind(project.display_order)
        .bind(project.published_at)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("projects_slug_key") {
                    return AppError::Conflict("Slug already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects(&self, filter: &ProjectListFilter) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM projects WHERE deleted_at IS NULL");
        push_list_predicates(&mut builder, filter);

        builder.push(" ORDER BY display_order ASC, created_at DESC");
        builder.push(" LIMIT ").push_bind(filter.per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(filter.page, filter.per_page));

        let projects = builder.build_query_as::<Project>().fetch_all(&self.pool).await?;
        Ok(projects)
    }

    async fn count_projects(&self, filter: &ProjectListFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM projects WHERE deleted_at IS NULL");
        push_list_predicates(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError> {
        let current = self.get_project_by_id(id).await?;

        let resolved_slug = resolve_slug_for_rename(
            &current.title,
            &current.slug,
            patch.title.as_str(),
            patch.slug.as_str(),
        );

        let mut builder = QueryBuilder::new("UPDATE projects SET updated_at = NOW()");
        builder.push(", slug = ").push_bind(resolved_slug);

        if let OptionField::SetToValue(title) = &patch.title {
            builder.push(", title = ").push_bind(title);
        }
        push_nullable_text(&mut builder, "summary", &patch.summary);
        if let OptionField::SetToValue(content) = &patch.content_markdown {
            builder.push(", content_markdown = ").push_bind(content);
        }
        if let OptionField::SetToValue(technologies) = &patch.technologies {
            builder.push(", technologies = ").push_bind(technologies);
        }
        push_nullable_text(&mut builder, "github_url", &patch.github_url);
        push_nullable_text(&mut builder, "live_url", &patch.live_url);
        if let OptionField::SetToValue(status) = &patch.status {
            builder.push(", status = ").push_bind(*status);
        }
        if let OptionField::SetToValue(order) = &patch.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" AND deleted_at IS NULL RETURNING *");

        let project = builder
            .build_query_as::<Project>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some("projects_slug_key") {
                        return AppError::Conflict("Slug already exists".into());
                    }
                }
                AppError::from(e)
            })?;

        Ok(project)
    }

    async fn set_project_status(&self, id: &Uuid, status: ContentStatus) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                status = $1,
                published_at = CASE
                    WHEN $1 = 'published'::content_status THEN COALESCE(published_at, NOW())
                    ELSE published_at
                END,
                updated_at = NOW()
            WHERE id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn soft_delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }
        Ok(())
    }

    async fn hard_delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }
        Ok(())
    }

    async fn purge_soft_deleted(&self, older_than_days: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM projects WHERE deleted_at IS NOT NULL AND deleted_at < NOW() - ($1 || ' days')::interval",
        )
        .bind(older_than_days.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_images(&self, project_id: &Uuid) -> Result<Vec<ProjectImage>, AppError> {
        fetch_gallery(&self.pool, project_id).await
    }

    async fn cover_images(&self, project_ids: &[Uuid]) -> Result<Vec<ProjectImage>, AppError> {
        let images = sqlx::query_as::<_, ProjectImage>(
            r#"
            SELECT DISTINCT ON (project_id) * FROM project_images
            WHERE project_id = ANY($1)
            ORDER BY project_id, display_order ASC
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn attach_image(
        &self,
        project_id: &Uuid,
        media_id: &Uuid,
        url: &str,
        alt_text: &str,
        caption: Option<String>,
    ) -> Result<Vec<ProjectImage>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Appends at the tail: next index is the current gallery size.
        sqlx::query(
            r#"
            INSERT INTO project_images (project_id, media_id, url, alt_text, caption, display_order, created_at)
            SELECT $1, $2, $3, $4, $5, COUNT(*), NOW()
            FROM project_images WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .bind(media_id)
        .bind(url)
        .bind(alt_text)
        .bind(caption)
        .execute(&mut *tx)
        .await?;

        renumber_gallery(&mut tx, project_id).await?;
        tx.commit().await?;

        fetch_gallery(&self.pool, project_id).await
    }

    async fn remove_image(&self, project_id: &Uuid, image_id: &Uuid) -> Result<Vec<ProjectImage>, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM project_images WHERE id = $1 AND project_id = $2")
            .bind(image_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Image not found".into()));
        }

        renumber_gallery(&mut tx, project_id).await?;
        tx.commit().await?;

        fetch_gallery(&self.pool, project_id).await
    }

    async fn reorder_images(&self, project_id: &Uuid, ordered_ids: &[Uuid]) -> Result<Vec<ProjectImage>, AppError> {
        let mut tx = self.pool.begin().await?;

        let current_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM project_images WHERE project_id = $1 ORDER BY display_order ASC",
        )
        .bind(project_id)
        .fetch_all(&mut *tx)
        .await?;

        // The request must be a permutation of the gallery; anything else
        // (missing ids, foreign ids, duplicates) would leave holes or
        // duplicate display_order values.
        if !is_permutation_of(ordered_ids, &current_ids) {
            return Err(AppError::InvalidInput(
                "Reorder must list every gallery image exactly once".into(),
            ));
        }

        for (position, image_id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE project_images SET display_order = $1 WHERE id = $2 AND project_id = $3",
            )
            .bind(position as i32)
            .bind(image_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        fetch_gallery(&self.pool, project_id).await
    }
}
