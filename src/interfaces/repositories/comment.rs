use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::comment::{Comment, NewCommentRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxCommentRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, post_id: &Uuid, comment: &NewCommentRequest) -> Result<Comment, AppError>;
    async fn list_comments_for_post(&self, post_id: &Uuid, approved_only: bool) -> Result<Vec<Comment>, AppError>;
    async fn count_comments_for_post(&self, post_id: &Uuid, approved_only: bool) -> Result<i64, AppError>;
    async fn moderate_comment(&self, id: &Uuid, approved: bool) -> Result<Comment, AppError>;
    async fn soft_delete_comment(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete_comment(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCommentRepo { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepo {
    async fn create_comment(&self, post_id: &Uuid, comment: &NewCommentRequest) -> Result<Comment, AppError> {
        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_name, author_email, body, is_approved, created_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW())
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(&comment.author_name)
        .bind(&comment.author_email)
        .bind(&comment.body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23503") {
                    return AppError::NotFound("Blog post not found".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn list_comments_for_post(&self, post_id: &Uuid, approved_only: bool) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM comments
            WHERE post_id = $1
              AND deleted_at IS NULL
              AND ($2::boolean IS FALSE OR is_approved = TRUE)
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .bind(approved_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn count_comments_for_post(&self, post_id: &Uuid, approved_only: bool) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM comments
            WHERE post_id = $1
              AND deleted_at IS NULL
              AND ($2::boolean IS FALSE OR is_approved = TRUE)
            "#,
        )
        .bind(post_id)
        .bind(approved_only)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn moderate_comment(&self, id: &Uuid, approved: bool) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET is_approved = $1
            WHERE id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(approved)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn soft_delete_comment(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".into()));
        }
        Ok(())
    }

    async fn hard_delete_comment(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found".into()));
        }
        Ok(())
    }
}
