use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::navigation::AdminSection,
    entities::user::{
        AssignRolesRequest, NewRoleRequest, NewUserRequest, Role, RoleAssignmentResponse,
        RoleDiff, UserListResponse, UserWithRoles,
    },
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::user::{attach_roles, UserRepository},
};

pub struct UserHandler<R>
where
    R: UserRepository,
{
    pub user_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> UserHandler<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: R, cache: Arc<CollectionCache>) -> Self {
        UserHandler { user_repo, cache }
    }

    pub async fn create_user(&self, request: NewUserRequest) -> Result<UserWithRoles, AppError> {
        request.validate()?;

        let user = self.user_repo.create_user(&request).await?;
        let roles = self.user_repo.roles_for_user(&user.id).await?;
        self.cache.invalidate_section(AdminSection::Users);

        Ok(attach_roles(user, roles))
    }

    pub async fn get_user(&self, id: &Uuid) -> Result<UserWithRoles, AppError> {
        let (user, roles) = futures::try_join!(
            self.user_repo.get_user_by_id(id),
            self.user_repo.roles_for_user(id),
        )?;

        Ok(attach_roles(user, roles))
    }

    pub async fn list_users(&self) -> Result<UserListResponse, AppError> {
        let (users, total) = futures::try_join!(
            self.user_repo.list_users(),
            self.user_repo.count_users(),
        )?;

        let mut with_roles = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.user_repo.roles_for_user(&user.id).await?;
            with_roles.push(attach_roles(user, roles));
        }

        Ok(UserListResponse { users: with_roles, total })
    }

    pub async fn delete_user(&self, id: &Uuid, hard_delete: bool) -> Result<(), AppError> {
        match hard_delete {
            true => self.user_repo.hard_delete_user(id).await?,
            false => self.user_repo.soft_delete_user(id).await?,
        }

        self.cache.invalidate_section(AdminSection::Users);
        Ok(())
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        self.user_repo.list_roles().await
    }

    pub async fn create_role(&self, request: NewRoleRequest) -> Result<Role, AppError> {
        request.validate()?;

        self.user_repo
            .create_role(request.name.trim(), request.description.clone())
            .await
    }

    /// Reassign a user's roles to exactly the requested set.
    ///
    /// The change is applied as a diff against current assignments, in one
    /// transaction, so unchanged roles are never dropped and re-added and a
    /// mid-flight failure leaves the previous set intact.
    pub async fn assign_roles(
        &self,
        user_id: &Uuid,
        request: &AssignRolesRequest,
    ) -> Result<RoleAssignmentResponse, AppError> {
        // Existence check first so an unknown user is a 404, not a no-op.
        self.user_repo.get_user_by_id(user_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            _ => e,
        })?;

        let current = self.user_repo.current_role_ids(user_id).await?;
        let diff = RoleDiff::compute(&current, &request.role_ids);

        self.user_repo.apply_role_diff(user_id, &diff).await?;
        let roles = self.user_repo.roles_for_user(user_id).await?;
        self.cache.invalidate_section(AdminSection::Users);

        Ok(RoleAssignmentResponse {
            user_id: *user_id,
            added: diff.to_add,
            removed: diff.to_remove,
            roles,
        })
    }
}
