use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    domain::slug::resolve_slug_for_rename,
    entities::{
        option_fields::OptionField,
        taxonomy::{Category, CategoryWithCount, Tag, UpdateCategoryRequest, UpdateTagRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxTaxonomyRepo,
};

// The description parameter is owned: mockall cannot name the elided
// lifetime inside `Option<&str>` when generating the mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn create_category(&self, name: &str, slug: &str, description: Option<String>, display_order: i32) -> Result<Category, AppError>;
    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, AppError>;
    async fn get_category_by_id(&self, id: &Uuid) -> Result<Category, AppError>;
    async fn update_category(&self, id: &Uuid, patch: &UpdateCategoryRequest) -> Result<Category, AppError>;
    async fn delete_category(&self, id: &Uuid) -> Result<(), AppError>;

    async fn create_tag(&self, name: &str, slug: &str, display_order: i32) -> Result<Tag, AppError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, AppError>;
    async fn get_tag_by_id(&self, id: &Uuid) -> Result<Tag, AppError>;
    async fn update_tag(&self, id: &Uuid, patch: &UpdateTagRequest) -> Result<Tag, AppError>;
    async fn delete_tag(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxTaxonomyRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxTaxonomyRepo { pool }
    }
}

fn slug_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict("Slug already exists".into());
        }
    }
    AppError::from(e)
}

#[async_trait]
impl TaxonomyRepository for SqlxTaxonomyRepo {
    async fn create_category(&self, name: &str, slug: &str, description: Option<String>, display_order: i32) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description, display_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(slug_conflict)?;

        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, AppError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.*, COUNT(p.id) AS post_count
            FROM categories c
            LEFT JOIN blog_posts p ON p.category_id = c.id AND p.deleted_at IS NULL
            GROUP BY c.id
            ORDER BY c.display_order ASC, c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn get_category_by_id(&self, id: &Uuid) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(category)
    }

    async fn update_category(&self, id: &Uuid, patch: &UpdateCategoryRequest) -> Result<Category, AppError> {
        let current = self.get_category_by_id(id).await?;

        let resolved_slug = resolve_slug_for_rename(
            &current.name,
            &current.slug,
            patch.name.as_deref(),
            patch.slug.as_deref(),
        );

        let mut builder = QueryBuilder::new("UPDATE categories SET updated_at = NOW()");
        builder.push(", slug = ").push_bind(resolved_slug);
        if let Some(name) = &patch.name {
            builder.push(", name = ").push_bind(name);
        }
        match &patch.description {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                builder.push(", description = NULL");
            }
            OptionField::SetToValue(description) => {
                builder.push(", description = ").push_bind(description);
            }
        }
        if let OptionField::SetToValue(order) = &patch.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }
        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" RETURNING *");

        let category = builder
            .build_query_as::<Category>()
            .fetch_one(&self.pool)
            .await
            .map_err(slug_conflict)?;

        Ok(category)
    }

    async fn delete_category(&self, id: &Uuid) -> Result<(), AppError> {
        // Posts keep working without a category; the FK is ON DELETE SET NULL.
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(())
    }

    async fn create_tag(&self, name: &str, slug: &str, display_order: i32) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug, display_order, created_at) VALUES ($1, $2, $3, NOW()) RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(slug_conflict)?;

        Ok(tag)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY display_order ASC, name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    async fn get_tag_by_id(&self, id: &Uuid) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(tag)
    }

    async fn update_tag(&self, id: &Uuid, patch: &UpdateTagRequest) -> Result<Tag, AppError> {
        let current = self.get_tag_by_id(id).await?;

        let resolved_slug = resolve_slug_for_rename(
            &current.name,
            &current.slug,
            patch.name.as_deref(),
            patch.slug.as_deref(),
        );

        let mut builder = QueryBuilder::new("UPDATE tags SET slug = ");
        builder.push_bind(resolved_slug);
        if let Some(name) = &patch.name {
            builder.push(", name = ").push_bind(name);
        }
        if let OptionField::SetToValue(order) = &patch.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }
        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" RETURNING *");

        let tag = builder
            .build_query_as::<Tag>()
            .fetch_one(&self.pool)
            .await
            .map_err(slug_conflict)?;

        Ok(tag)
    }

    async fn delete_tag(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag not found".into()));
        }
        Ok(())
    }
}
