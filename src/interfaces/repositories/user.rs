use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::user::{AdminUser, NewUserRequest, Role, RoleDiff, UserWithRoles},
    errors::AppError,
    repositories::sqlx_repo::SqlxUserRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, request: &NewUserRequest) -> Result<AdminUser, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<AdminUser, AppError>;
    async fn list_users(&self) -> Result<Vec<AdminUser>, AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;
    async fn soft_delete_user(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete_user(&self, id: &Uuid) -> Result<(), AppError>;
    async fn purge_soft_deleted_users(&self, older_than_days: i64) -> Result<u64, AppError>;

    async fn list_roles(&self) -> Result<Vec<Role>, AppError>;
    // Owned description: mockall cannot name the elided lifetime inside
    // `Option<&str>` when generating the mock.
    async fn create_role(&self, name: &str, description: Option<String>) -> Result<Role, AppError>;
    async fn roles_for_user(&self, user_id: &Uuid) -> Result<Vec<Role>, AppError>;
    async fn current_role_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, AppError>;

    /// Apply a role diff atomically: both removals and additions commit
    /// together or not at all, so a failure never strands the user with a
    /// partial role set.
    async fn apply_role_diff(&self, user_id: &Uuid, diff: &RoleDiff) -> Result<(), AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

pub fn attach_roles(user: AdminUser, roles: Vec<Role>) -> UserWithRoles {
    UserWithRoles {
        id: user.id,
        email: user.email,
        username: user.username,
        is_active: user.is_active,
        roles,
        created_at: user.created_at,
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn create_user(&self, request: &NewUserRequest) -> Result<AdminUser, AppError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (email, username, is_active, created_at, updated_at)
            VALUES ($1, $2, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&request.email)
        .bind(&request.username)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::Conflict("A user with this email already exists".into());
                }
            }
            AppError::from(e)
        })?;

        for role_id in &request.role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<AdminUser, AppError> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT * FROM admin_users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<AdminUser>, AppError> {
        let users = sqlx::query_as::<_, AdminUser>(
            "SELECT * FROM admin_users WHERE deleted_at IS NULL ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admin_users WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn soft_delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE admin_users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }

    async fn hard_delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }

    async fn purge_soft_deleted_users(&self, older_than_days: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM admin_users WHERE deleted_at IS NOT NULL AND deleted_at < NOW() - ($1 || ' days')::interval",
        )
        .bind(older_than_days.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    async fn create_role(&self, name: &str, description: Option<String>) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description, created_at) VALUES ($1, $2, NOW()) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::Conflict("A role with this name already exists".into());
                }
            }
            AppError::from(e)
        })?;

        Ok(role)
    }

    async fn roles_for_user(&self, user_id: &Uuid) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.* FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn current_role_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    async fn apply_role_diff(&self, user_id: &Uuid, diff: &RoleDiff) -> Result<(), AppError> {
        if diff.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        if !diff.to_remove.is_empty() {
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = ANY($2)")
                .bind(user_id)
                .bind(&diff.to_remove)
                .execute(&mut *tx)
                .await?;
        }

        for role_id in &diff.to_add {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some("23503") {
                        return AppError::InvalidInput(format!("Unknown role id: {role_id}"));
                    }
                }
                AppError::from(e)
            })?;
        }

        tx.commit().await?;
        Ok(())
    }
}
