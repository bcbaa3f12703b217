use tokio::time::{interval, Duration};

use crate::{
    constants::PURGE_RETENTION_DAYS,
    repositories::{
        blog_post::BlogPostRepository,
        contact::ContactRepository,
        project::ProjectRepository,
        sqlx_repo::{SqlxBlogPostRepo, SqlxContactRepo, SqlxProjectRepo, SqlxUserRepo},
        user::UserRepository,
    },
};

/// Daily sweep of rows soft-deleted longer ago than the retention window.
pub async fn start_purge_task(
    blog_repo: SqlxBlogPostRepo,
    project_repo: SqlxProjectRepo,
    contact_repo: SqlxContactRepo,
    user_repo: SqlxUserRepo,
) {
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match blog_repo.purge_soft_deleted(PURGE_RETENTION_DAYS).await {
            Ok(count) => tracing::info!("Purged {} soft-deleted blog posts", count),
            Err(e) => tracing::error!("Blog post purge failed: {}", e),
        }
        match project_repo.purge_soft_deleted(PURGE_RETENTION_DAYS).await {
            Ok(count) => tracing::info!("Purged {} soft-deleted projects", count),
            Err(e) => tracing::error!("Project purge failed: {}", e),
        }
        match contact_repo.purge_soft_deleted(PURGE_RETENTION_DAYS).await {
            Ok(count) => tracing::info!("Purged {} soft-deleted contact messages", count),
            Err(e) => tracing::error!("Contact message purge failed: {}", e),
        }
        match user_repo.purge_soft_deleted_users(PURGE_RETENTION_DAYS).await {
            Ok(count) => tracing::info!("Purged {} soft-deleted users", count),
            Err(e) => tracing::error!("User purge failed: {}", e),
        }
    }
}
