use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::contact::{ContactMessage, ContactMessageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact_message(&self, message: &ContactMessageInsert) -> Result<Uuid, AppError>;
    async fn get_contact_message_by_id(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_contact_messages(&self) -> Result<i64, AppError>;
    async fn count_unread_messages(&self) -> Result<i64, AppError>;
    async fn mark_message_read(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
    async fn soft_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError>;
    async fn purge_soft_deleted(&self, older_than_days: i64) -> Result<u64, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact_message(&self, message: &ContactMessageInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_contact_message_by_id(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn count_contact_messages(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn count_unread_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE deleted_at IS NULL AND is_read = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_message_read(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages SET is_read = TRUE
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn soft_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE contact_messages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }
        Ok(())
    }

    async fn hard_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
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
            "DELETE FROM contact_messages WHERE deleted_at IS NOT NULL AND deleted_at < NOW() - ($1 || ' days')::interval",
        )
        .bind(older_than_days.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
