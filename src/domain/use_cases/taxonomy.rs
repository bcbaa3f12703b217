use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{navigation::AdminSection, slug::derive_slug},
    entities::taxonomy::{
        Category, CategoryWithCount, NewCategoryRequest, NewTagRequest, Tag,
        UpdateCategoryRequest, UpdateTagRequest,
    },
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::taxonomy::TaxonomyRepository,
};

pub struct TaxonomyHandler<R>
where
    R: TaxonomyRepository,
{
    pub taxonomy_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> TaxonomyHandler<R>
where
    R: TaxonomyRepository,
{
    pub fn new(taxonomy_repo: R, cache: Arc<CollectionCache>) -> Self {
        TaxonomyHandler { taxonomy_repo, cache }
    }

    pub async fn create_category(
        &self,
        request: NewCategoryRequest,
    ) -> Result<Category, AppError> {
        request.validate()?;

        let name = request.name.trim().to_string();
        let slug = request
            .slug
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| derive_slug(&name));

        let category = self
            .taxonomy_repo
            .create_category(&name, &slug, request.description.clone(), request.display_order)
            .await?;

        // Category renames ripple through post list rows.
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, AppError> {
        self.taxonomy_repo.list_categories().await
    }

    pub async fn update_category(
        &self,
        id: &Uuid,
        patch: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        patch.validate()?;

        let category = self.taxonomy_repo.update_category(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(category)
    }

    pub async fn delete_category(&self, id: &Uuid) -> Result<(), AppError> {
        self.taxonomy_repo.delete_category(id).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(())
    }

    pub async fn create_tag(&self, request: NewTagRequest) -> Result<Tag, AppError> {
        request.validate()?;

        let name = request.name.trim().to_string();
        let slug = request
            .slug
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| derive_slug(&name));

        let tag = self.taxonomy_repo.create_tag(&name, &slug, request.display_order).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(tag)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.taxonomy_repo.list_tags().await
    }

    pub async fn update_tag(
        &self,
        id: &Uuid,
        patch: &UpdateTagRequest,
    ) -> Result<Tag, AppError> {
        patch.validate()?;

        let tag = self.taxonomy_repo.update_tag(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: &Uuid) -> Result<(), AppError> {
        self.taxonomy_repo.delete_tag(id).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::taxonomy::MockTaxonomyRepository;
    use chrono::Utc;

    fn handler(repo: MockTaxonomyRepository) -> TaxonomyHandler<MockTaxonomyRepository> {
        TaxonomyHandler::new(repo, Arc::new(CollectionCache::new()))
    }

    #[tokio::test]
    async fn create_derives_slug_when_absent() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_create_category()
            .withf(|name, slug, _, _| name == "Web Development" && slug == "web-development")
            .returning(|name, slug, description, display_order| {
                Ok(Category {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                    description,
                    display_order,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let request = NewCategoryRequest {
            name: "Web Development".to_string(),
            slug: None,
            description: None,
            display_order: 0,
        };
        let category = handler(repo).create_category(request).await.unwrap();
        assert_eq!(category.slug, "web-development");
    }

    #[tokio::test]
    async fn create_keeps_explicit_slug() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_create_tag()
            .withf(|name, slug, _| name == "Rust" && slug == "rustlang")
            .returning(|name, slug, display_order| {
                Ok(Tag {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                    display_order,
                    created_at: Utc::now(),
                })
            });

        let request = NewTagRequest {
            name: "Rust".to_string(),
            slug: Some("rustlang".to_string()),
            display_order: 0,
        };
        let tag = handler(repo).create_tag(request).await.unwrap();
        assert_eq!(tag.slug, "rustlang");
    }

    #[tokio::test]
    async fn category_mutations_invalidate_blog_collections() {
        let cache = Arc::new(CollectionCache::new());
        cache.insert(AdminSection::Blog, "page=1", &serde_json::json!([]));

        let mut repo = MockTaxonomyRepository::new();
        repo.expect_delete_category().returning(|_| Ok(()));

        let handler = TaxonomyHandler::new(repo, cache.clone());
        handler.delete_category(&Uuid::new_v4()).await.unwrap();

        assert!(cache.get(AdminSection::Blog, "page=1").is_none());
    }

    #[tokio::test]
    async fn short_name_is_rejected_before_the_repository() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_create_category().times(0);

        let request = NewCategoryRequest {
            name: "x".to_string(),
            slug: None,
            description: None,
            display_order: 0,
        };
        let result = handler(repo).create_category(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
