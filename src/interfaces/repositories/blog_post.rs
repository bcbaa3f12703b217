use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    domain::slug::resolve_slug_for_rename,
    entities::{
        blog_post::{BlogPost, BlogPostInsert, UpdateBlogPostRequest},
        content_status::ContentStatus,
        option_fields::OptionField,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxBlogPostRepo,
};

/// Helper to compute OFFSET safely from 1-based `page` and `per_page`.
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

/// Client-side list filters translated to SQL predicates: substring
/// search on title/content, equality on status and category.
#[derive(Debug, Default, Clone)]
pub struct BlogPostListFilter {
    pub query: Option<String>,
    pub status: Option<ContentStatus>,
    pub category_id: Option<Uuid>,
    pub page: u32,
    pub per_page: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<Uuid, AppError>;
    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError>;
    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError>;
    async fn list_blog_posts(&self, filter: &BlogPostListFilter) -> Result<Vec<BlogPost>, AppError>;
    async fn count_blog_posts(&self, filter: &BlogPostListFilter) -> Result<i64, AppError>;
    async fn update_blog_post(&self, id: &Uuid, post: &UpdateBlogPostRequest) -> Result<BlogPost, AppError>;
    async fn set_blog_post_status(&self, id: &Uuid, status: ContentStatus) -> Result<BlogPost, AppError>;
    async fn soft_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
    async fn purge_soft_deleted(&self, older_than_days: i64) -> Result<u64, AppError>;
}

impl SqlxBlogPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

fn push_list_predicates<'a>(builder: &mut QueryBuilder<'a, sqlx::Postgres>, filter: &'a BlogPostListFilter) {
    if let Some(query) = &filter.query {
        builder.push(" AND (title ILIKE ").push_bind(format!("%{}%", query));
        builder.push(" OR excerpt ILIKE ").push_bind(format!("%{}%", query));
        builder.push(" OR content_markdown ILIKE ").push_bind(format!("%{}%", query));
        builder.push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(category_id) = filter.category_id {
        builder.push(" AND category_id = ").push_bind(category_id);
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content_markdown, cover_image_url, status,
                category_id, tags, display_order, published_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content_markdown)
        .bind(&post.cover_image_url)
        .bind(post.status)
        .bind(post.category_id)
        .bind(&post.tags)
        .bind(post.display_order)
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("blog_posts_slug_key") {
                    return AppError::Conflict("Slug already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        let post = sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError> {
        let post = sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE slug = $1 AND deleted_at IS NULL",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_blog_posts(&self, filter: &BlogPostListFilter) -> Result<Vec<BlogPost>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM blog_posts WHERE deleted_at IS NULL");
        push_list_predicates(&mut builder, filter);

        builder.push(" ORDER BY display_order ASC, created_at DESC");
        builder.push(" LIMIT ").push_bind(filter.per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(filter.page, filter.per_page));

        let posts = builder.build_query_as::<BlogPost>().fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn count_blog_posts(&self, filter: &BlogPostListFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM blog_posts WHERE deleted_at IS NULL");
        push_list_predicates(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn update_blog_post(&self, id: &Uuid, post: &UpdateBlogPostRequest) -> Result<BlogPost, AppError> {
        let current = self.get_blog_post_by_id(id).await?;

        // The slug tracks the title only while it is still the derived
        // form of the current title; an explicit slug pins it for good.
        let resolved_slug = resolve_slug_for_rename(
            &current.title,
            &current.slug,
            post.title.as_str(),
            post.slug.as_str(),
        );

        let mut builder = QueryBuilder::new("UPDATE blog_posts SET updated_at = NOW()");
        builder.push(", slug = ").push_bind(resolved_slug);

        if let OptionField::SetToValue(title) = &post.title {
            builder.push(", title = ").push_bind(title);
        }
        push_nullable_text(&mut builder, "excerpt", &post.excerpt);
        if let OptionField::SetToValue(content) = &post.content_markdown {
            builder.push(", content_markdown = ").push_bind(content);
        }
        push_nullable_text(&mut builder, "cover_image_url", &post.cover_image_url);
        if let OptionField::SetToValue(status) = &post.status {
            builder.push(", status = ").push_bind(*status);
        }
        match &post.category_id {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                builder.push(", category_id = NULL");
            }
            OptionField::SetToValue(category_id) => {
                builder.push(", category_id = ").push_bind(*category_id);
            }
        }
        if let OptionField::SetToValue(tags) = &post.tags {
            builder.push(", tags = ").push_bind(tags);
        }
        if let OptionField::SetToValue(order) = &post.display_order {
            builder.push(", display_order = ").push_bind(*order);
        }

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" AND deleted_at IS NULL RETURNING *");

        let updated = builder
            .build_query_as::<BlogPost>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some("blog_posts_slug_key") {
                        return AppError::Conflict("Slug already exists".into());
                    }
                }
                AppError::from(e)
            })?;

        Ok(updated)
    }

    async fn set_blog_post_status(&self, id: &Uuid, status: ContentStatus) -> Result<BlogPost, AppError> {
        // Publishing backfills published_at only when it was never set;
        // other transitions leave the original publication time alone.
        let post = sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blog_posts SET
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

        Ok(post)
    }

    async fn soft_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE blog_posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }
        Ok(())
    }

    async fn hard_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
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
            "DELETE FROM blog_posts WHERE deleted_at IS NOT NULL AND deleted_at < NOW() - ($1 || ' days')::interval",
        )
        .bind(older_than_days.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// SET clause for a nullable text column driven by patch semantics:
/// absent keeps the stored value, explicit null clears it.
pub(crate) fn push_nullable_text<'a>(
    builder: &mut QueryBuilder<'a, sqlx::Postgres>,
    column: &str,
    field: &'a OptionField<String>,
) {
    match field {
        OptionField::Unchanged => {}
        OptionField::SetToNull => {
            builder.push(format!(", {column} = NULL"));
        }
        OptionField::SetToValue(value) => {
            builder.push(format!(", {column} = ")).push_bind(value);
        }
    }
}
