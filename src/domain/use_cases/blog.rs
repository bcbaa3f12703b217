use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::navigation::AdminSection,
    entities::{
        blog_post::{
            BlogPost, BlogPostCreatedResponse, BlogPostDetailResponse, BlogPostInsert,
            BlogPostListResponse, NewBlogPostRequest, UpdateBlogPostRequest,
        },
        content_status::ContentStatus,
    },
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::blog_post::{BlogPostListFilter, BlogPostRepository},
};

pub struct BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub blog_post_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub fn new(blog_post_repo: R, cache: Arc<CollectionCache>) -> Self {
        BlogPostHandler { blog_post_repo, cache }
    }

    /// Creates a new blog post with the provided data.
    pub async fn create_blog_post(
        &self,
        request: NewBlogPostRequest,
    ) -> Result<BlogPostCreatedResponse, AppError> {
        let insert = BlogPostInsert::try_from(request)?;

        let id = self.blog_post_repo.create_blog_post(&insert).await?;
        self.cache.invalidate_section(AdminSection::Blog);

        Ok(BlogPostCreatedResponse {
            id,
            slug: insert.slug.clone(),
            preview_url: format!("/blog/{}", insert.slug),
            admin_url: format!("/admin/blog/{}", id),
        })
    }

    pub async fn get_blog_post(&self, id: &Uuid) -> Result<BlogPostDetailResponse, AppError> {
        let post = self.blog_post_repo.get_blog_post_by_id(id).await?;
        Ok(post.to_detail_response())
    }

    /// Lists posts through the collection cache: a hit serves the cached
    /// payload, a miss fetches list + count and stores the result under
    /// the filter fingerprint.
    pub async fn list_blog_posts(&self, filter: BlogPostListFilter) -> Result<Value, AppError> {
        let category = filter.category_id.map(|id| id.to_string());
        let page = filter.page.to_string();
        let per_page = filter.per_page.to_string();
        let fingerprint = CollectionCache::fingerprint(&[
            ("q", filter.query.as_deref()),
            ("status", filter.status.map(|s| s.as_str())),
            ("category_id", category.as_deref()),
            ("page", Some(page.as_str())),
            ("per_page", Some(per_page.as_str())),
        ]);

        if let Some(cached) = self.cache.get(AdminSection::Blog, &fingerprint) {
            return Ok(cached);
        }

        let (posts, total) = futures::try_join!(
            self.blog_post_repo.list_blog_posts(&filter),
            self.blog_post_repo.count_blog_posts(&filter),
        )?;

        let response = BlogPostListResponse {
            posts: posts.iter().map(BlogPost::to_list_item).collect(),
            total,
            page: filter.page,
            per_page: filter.per_page,
        };

        self.cache.insert(AdminSection::Blog, &fingerprint, &response);
        serde_json::to_value(&response).map_err(|e| AppError::InternalError(e.to_string()))
    }

    pub async fn update_blog_post(
        &self,
        id: &Uuid,
        patch: &UpdateBlogPostRequest,
    ) -> Result<BlogPost, AppError> {
        patch.validate()?;

        let updated = self.blog_post_repo.update_blog_post(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(updated)
    }

    /// Publish / unpublish / archive. Publishing backfills `published_at`
    /// only when it was never set.
    pub async fn set_blog_post_status(
        &self,
        id: &Uuid,
        status: ContentStatus,
    ) -> Result<BlogPost, AppError> {
        let post = self.blog_post_repo.set_blog_post_status(id, status).await?;
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(post)
    }

    pub async fn delete_blog_post(&self, id: &Uuid, hard_delete: bool) -> Result<(), AppError> {
        match hard_delete {
            true => self.blog_post_repo.hard_delete_blog_post(id).await,
            false => self.blog_post_repo.soft_delete_blog_post(id).await,
        }
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Blog post not found".to_string()),
            _ => e,
        })?;

        self.cache.invalidate_section(AdminSection::Blog);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::blog_post::MockBlogPostRepository;

    fn handler(repo: MockBlogPostRepository) -> BlogPostHandler<MockBlogPostRepository> {
        BlogPostHandler::new(repo, Arc::new(CollectionCache::new()))
    }

    fn valid_request() -> NewBlogPostRequest {
        NewBlogPostRequest {
            title: "Hello World".to_string(),
            slug: None,
            excerpt: None,
            content_markdown: "Body".to_string(),
            cover_image_url: None,
            status: ContentStatus::Draft,
            category_id: None,
            tags: vec![],
            display_order: 0,
        }
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_the_repository() {
        let mut repo = MockBlogPostRepository::new();
        repo.expect_create_blog_post().times(0);

        let mut request = valid_request();
        request.title = "x".to_string(); // below minimum length

        let result = handler(repo).create_blog_post(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn create_returns_admin_and_preview_urls() {
        let id = Uuid::new_v4();
        let mut repo = MockBlogPostRepository::new();
        repo.expect_create_blog_post()
            .times(1)
            .returning(move |_| Ok(id));

        let response = handler(repo).create_blog_post(valid_request()).await.unwrap();
        assert_eq!(response.slug, "hello-world");
        assert_eq!(response.preview_url, "/blog/hello-world");
        assert_eq!(response.admin_url, format!("/admin/blog/{id}"));
    }

    #[tokio::test]
    async fn mutation_invalidates_cached_collections() {
        let cache = Arc::new(CollectionCache::new());
        cache.insert(AdminSection::Blog, "page=1", &vec!["stale"]);

        let mut repo = MockBlogPostRepository::new();
        repo.expect_soft_delete_blog_post().returning(|_| Ok(()));

        let handler = BlogPostHandler::new(repo, cache.clone());
        handler.delete_blog_post(&Uuid::new_v4(), false).await.unwrap();

        assert!(cache.get(AdminSection::Blog, "page=1").is_none());
    }

    #[tokio::test]
    async fn list_serves_cache_hits_without_repository_calls() {
        let cache = Arc::new(CollectionCache::new());
        let filter = BlogPostListFilter { page: 1, per_page: 10, ..Default::default() };
        let fingerprint = CollectionCache::fingerprint(&[
            ("q", None),
            ("status", None),
            ("category_id", None),
            ("page", Some("1")),
            ("per_page", Some("10")),
        ]);
        cache.insert(AdminSection::Blog, &fingerprint, &serde_json::json!({"posts": []}));

        let mut repo = MockBlogPostRepository::new();
        repo.expect_list_blog_posts().times(0);
        repo.expect_count_blog_posts().times(0);

        let handler = BlogPostHandler::new(repo, cache);
        let value = handler.list_blog_posts(filter).await.unwrap();
        assert_eq!(value, serde_json::json!({"posts": []}));
    }
}
