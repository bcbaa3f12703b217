use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::navigation::AdminSection,
    entities::comment::{Comment, CommentListResponse, NewCommentRequest},
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::comment::CommentRepository,
};

pub struct CommentHandler<R>
where
    R: CommentRepository,
{
    pub comment_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> CommentHandler<R>
where
    R: CommentRepository,
{
    pub fn new(comment_repo: R, cache: Arc<CollectionCache>) -> Self {
        CommentHandler { comment_repo, cache }
    }

    /// Visitor submission. Comments always start unapproved.
    pub async fn submit_comment(
        &self,
        post_id: &Uuid,
        request: NewCommentRequest,
    ) -> Result<Comment, AppError> {
        request.validate()?;
        self.comment_repo.create_comment(post_id, &request).await
    }

    pub async fn list_comments(
        &self,
        post_id: &Uuid,
        approved_only: bool,
    ) -> Result<CommentListResponse, AppError> {
        let (comments, total) = futures::try_join!(
            self.comment_repo.list_comments_for_post(post_id, approved_only),
            self.comment_repo.count_comments_for_post(post_id, approved_only),
        )?;

        Ok(CommentListResponse { comments, total })
    }

    pub async fn moderate_comment(
        &self,
        id: &Uuid,
        approved: bool,
    ) -> Result<Comment, AppError> {
        let comment = self
            .comment_repo
            .moderate_comment(id, approved)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Comment not found".to_string()),
                _ => e,
            })?;

        // Approved-comment counts show up on blog list rows.
        self.cache.invalidate_section(AdminSection::Blog);
        Ok(comment)
    }

    pub async fn delete_comment(&self, id: &Uuid, hard_delete: bool) -> Result<(), AppError> {
        match hard_delete {
            true => self.comment_repo.hard_delete_comment(id).await?,
            false => self.comment_repo.soft_delete_comment(id).await?,
        }

        self.cache.invalidate_section(AdminSection::Blog);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::comment::MockCommentRepository;

    fn handler(repo: MockCommentRepository) -> CommentHandler<MockCommentRepository> {
        CommentHandler::new(repo, Arc::new(CollectionCache::new()))
    }

    #[tokio::test]
    async fn bad_email_never_reaches_the_repository() {
        let mut repo = MockCommentRepository::new();
        repo.expect_create_comment().times(0);

        let request = NewCommentRequest {
            author_name: "Ada".to_string(),
            author_email: "not-an-email".to_string(),
            body: "Hello".to_string(),
        };
        let result = handler(repo).submit_comment(&Uuid::new_v4(), request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn list_pairs_comments_with_total() {
        let mut repo = MockCommentRepository::new();
        repo.expect_list_comments_for_post()
            .returning(|_, _| Ok(vec![]));
        repo.expect_count_comments_for_post().returning(|_, _| Ok(7));

        let response = handler(repo)
            .list_comments(&Uuid::new_v4(), true)
            .await
            .unwrap();
        assert!(response.comments.is_empty());
        assert_eq!(response.total, 7);
    }
}
