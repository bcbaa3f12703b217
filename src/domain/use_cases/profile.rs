use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::navigation::AdminSection,
    entities::profile::{ProfileResponse, UpsertProfileRequest},
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::profile::ProfileRepository,
};

pub struct ProfileHandler<R>
where
    R: ProfileRepository,
{
    pub profile_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> ProfileHandler<R>
where
    R: ProfileRepository,
{
    pub fn new(profile_repo: R, cache: Arc<CollectionCache>) -> Self {
        ProfileHandler { profile_repo, cache }
    }

    /// The response carries the bio both as stored markdown and as
    /// sanitized HTML ready to render.
    pub async fn get_profile(&self) -> Result<ProfileResponse, AppError> {
        let profile = self.profile_repo.get_profile().await?;
        Ok(ProfileResponse::from(profile))
    }

    pub async fn upsert_profile(
        &self,
        request: UpsertProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        request.validate()?;
        let normalized = request.normalized();

        let profile = self.profile_repo.upsert_profile(&normalized).await?;
        self.cache.invalidate_section(AdminSection::Profile);

        Ok(ProfileResponse::from(profile))
    }
}
