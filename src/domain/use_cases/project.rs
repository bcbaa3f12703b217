use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{
        navigation::AdminSection,
        ordering::{is_permutation_of, move_item, translate_focus},
    },
    entities::{
        content_status::ContentStatus,
        project::{
            AttachImageRequest, GalleryResponse, MoveImageRequest, NewProjectRequest, Project,
            ProjectDetailResponse, ProjectInsert, ProjectListItem, ProjectListResponse,
            ReorderImagesRequest, UpdateProjectRequest,
        },
    },
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::{
        media::MediaRepository,
        project::{ProjectListFilter, ProjectRepository},
    },
};

pub struct ProjectHandler<R, M>
where
    R: ProjectRepository,
    M: MediaRepository,
{
    pub project_repo: R,
    pub media_repo: M,
    pub cache: Arc<CollectionCache>,
}

impl<R, M> ProjectHandler<R, M>
where
    R: ProjectRepository,
    M: MediaRepository,
{
    pub fn new(project_repo: R, media_repo: M, cache: Arc<CollectionCache>) -> Self {
        ProjectHandler { project_repo, media_repo, cache }
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let insert = ProjectInsert::try_from(request)?;

        let id = self.project_repo.create_project(&insert).await?;
        self.cache.invalidate_section(AdminSection::Projects);

        self.project_repo.get_project_by_id(&id).await
    }

    pub async fn get_project(&self, id: &Uuid) -> Result<ProjectDetailResponse, AppError> {
        let (project, images) = futures::try_join!(
            self.project_repo.get_project_by_id(id),
            self.project_repo.list_images(id),
        )?;

        Ok(project.to_detail_response(images))
    }

    pub async fn list_projects(&self, filter: ProjectListFilter) -> Result<Value, AppError> {
        let page = filter.page.to_string();
        let per_page = filter.per_page.to_string();
        let fingerprint = CollectionCache::fingerprint(&[
            ("q", filter.query.as_deref()),
            ("status", filter.status.map(|s| s.as_str())),
            ("tech", filter.technology.as_deref()),
            ("page", Some(page.as_str())),
            ("per_page", Some(per_page.as_str())),
        ]);

        if let Some(cached) = self.cache.get(AdminSection::Projects, &fingerprint) {
            return Ok(cached);
        }

        let (projects, total) = futures::try_join!(
            self.project_repo.list_projects(&filter),
            self.project_repo.count_projects(&filter),
        )?;

        // Cover image is the gallery's first entry, fetched for the
        // whole page in one query.
        let ids: Vec<Uuid> = projects.iter().map(|project| project.id).collect();
        let mut covers: HashMap<Uuid, String> = self
            .project_repo
            .cover_images(&ids)
            .await?
            .into_iter()
            .map(|image| (image.project_id, image.url))
            .collect();

        let items = projects
            .iter()
            .map(|project| ProjectListItem {
                id: project.id,
                title: project.title.clone(),
                slug: project.slug.clone(),
                summary: project.summary.clone(),
                technologies: project.technologies.clone(),
                status: project.status,
                display_order: project.display_order,
                cover_url: covers.remove(&project.id),
                updated_at: project.updated_at,
            })
            .collect();

        let response = ProjectListResponse {
            projects: items,
            total,
            page: filter.page,
            per_page: filter.per_page,
        };

        self.cache.insert(AdminSection::Projects, &fingerprint, &response);
        serde_json::to_value(&response).map_err(|e| AppError::InternalError(e.to_string()))
    }

    pub async fn update_project(
        &self,
        id: &Uuid,
        patch: &UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        patch.validate()?;

        let updated = self.project_repo.update_project(id, patch).await?;
        self.cache.invalidate_section(AdminSection::Projects);
        Ok(updated)
    }

    pub async fn set_project_status(
        &self,
        id: &Uuid,
        status: ContentStatus,
    ) -> Result<Project, AppError> {
        let project = self.project_repo.set_project_status(id, status).await?;
        self.cache.invalidate_section(AdminSection::Projects);
        Ok(project)
    }

    pub async fn delete_project(&self, id: &Uuid, hard_delete: bool) -> Result<(), AppError> {
        match hard_delete {
            true => self.project_repo.hard_delete_project(id).await,
            false => self.project_repo.soft_delete_project(id).await,
        }
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Project not found".to_string()),
            _ => e,
        })?;

        self.cache.invalidate_section(AdminSection::Projects);
        Ok(())
    }

    /// Attach an uploaded media asset to the gallery tail.
    pub async fn attach_image(
        &self,
        project_id: &Uuid,
        request: AttachImageRequest,
    ) -> Result<GalleryResponse, AppError> {
        request.validate()?;

        let asset = self
            .media_repo
            .get_media_asset_by_id(&request.media_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Media asset not found".to_string()),
                _ => e,
            })?;

        let images = self
            .project_repo
            .attach_image(
                project_id,
                &request.media_id,
                &asset.public_url,
                &request.alt_text,
                request.caption.clone(),
            )
            .await?;

        self.cache.invalidate_section(AdminSection::Projects);
        Ok(GalleryResponse { images, focused_index: None })
    }

    pub async fn remove_image(
        &self,
        project_id: &Uuid,
        image_id: &Uuid,
    ) -> Result<GalleryResponse, AppError> {
        let images = self.project_repo.remove_image(project_id, image_id).await?;
        self.cache.invalidate_section(AdminSection::Projects);
        Ok(GalleryResponse { images, focused_index: None })
    }

    /// Drag-and-drop move of a single image. The focused index follows
    /// the same image across the move.
    pub async fn move_image(
        &self,
        project_id: &Uuid,
        request: &MoveImageRequest,
    ) -> Result<GalleryResponse, AppError> {
        let current = self.project_repo.list_images(project_id).await?;

        let mut ids: Vec<Uuid> = current.iter().map(|image| image.id).collect();
        if !move_item(&mut ids, request.from, request.to) {
            return Err(AppError::InvalidInput("Image index out of bounds".into()));
        }

        let focused_index = request
            .focused_index
            .filter(|focus| *focus < current.len())
            .map(|focus| translate_focus(focus, request.from, request.to));

        let images = self.project_repo.reorder_images(project_id, &ids).await?;
        self.cache.invalidate_section(AdminSection::Projects);

        Ok(GalleryResponse { images, focused_index })
    }

    /// Replace the gallery ordering wholesale with an explicit id list.
    /// The list must name every gallery image exactly once; duplicates
    /// or foreign ids are rejected before anything is written.
    pub async fn reorder_images(
        &self,
        project_id: &Uuid,
        request: &ReorderImagesRequest,
    ) -> Result<GalleryResponse, AppError> {
        let current = self.project_repo.list_images(project_id).await?;
        let current_ids: Vec<Uuid> = current.iter().map(|image| image.id).collect();
        if !is_permutation_of(&request.image_ids, &current_ids) {
            return Err(AppError::InvalidInput(
                "Reorder must list every gallery image exactly once".into(),
            ));
        }

        let images = self
            .project_repo
            .reorder_images(project_id, &request.image_ids)
            .await?;

        self.cache.invalidate_section(AdminSection::Projects);
        Ok(GalleryResponse { images, focused_index: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::ProjectImage;
    use crate::repositories::{media::MockMediaRepository, project::MockProjectRepository};
    use chrono::Utc;

    fn gallery(ids: &[Uuid]) -> Vec<ProjectImage> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| ProjectImage {
                id: *id,
                project_id: Uuid::new_v4(),
                media_id: Uuid::new_v4(),
                url: format!("http://cdn.test/{index}.png"),
                alt_text: format!("image {index}"),
                caption: None,
                display_order: index as i32,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[tokio::test]
    async fn move_translates_focus_and_reorders_ids() {
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let current = gallery(&ids);

        let mut project_repo = MockProjectRepository::new();
        {
            let current = current.clone();
            project_repo
                .expect_list_images()
                .returning(move |_| Ok(current.clone()));
        }
        let expected_order = vec![ids[1], ids[2], ids[0]];
        {
            let expected = expected_order.clone();
            project_repo
                .expect_reorder_images()
                .withf(move |_, ordered| ordered == expected.as_slice())
                .returning(move |_, ordered| {
                    Ok(gallery(ordered))
                });
        }

        let handler = ProjectHandler::new(
            project_repo,
            MockMediaRepository::new(),
            Arc::new(CollectionCache::new()),
        );

        let request = MoveImageRequest { from: 0, to: 2, focused_index: Some(1) };
        let response = handler.move_image(&Uuid::new_v4(), &request).await.unwrap();

        // Focus was on the second image, which shifted one slot toward
        // the vacated head position.
        assert_eq!(response.focused_index, Some(0));
        let orders: Vec<i32> = response.images.iter().map(|i| i.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn out_of_bounds_move_is_rejected_before_any_write() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let current = gallery(&ids);

        let mut project_repo = MockProjectRepository::new();
        project_repo
            .expect_list_images()
            .returning(move |_| Ok(current.clone()));
        project_repo.expect_reorder_images().times(0);

        let handler = ProjectHandler::new(
            project_repo,
            MockMediaRepository::new(),
            Arc::new(CollectionCache::new()),
        );

        let request = MoveImageRequest { from: 0, to: 5, focused_index: None };
        let result = handler.move_image(&Uuid::new_v4(), &request).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn duplicate_ids_in_reorder_are_rejected_before_any_write() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let current = gallery(&ids);

        let mut project_repo = MockProjectRepository::new();
        project_repo
            .expect_list_images()
            .returning(move |_| Ok(current.clone()));
        // A repeated id standing in for a missing one must never reach
        // the positional UPDATE, which would write duplicate orders.
        project_repo.expect_reorder_images().times(0);

        let handler = ProjectHandler::new(
            project_repo,
            MockMediaRepository::new(),
            Arc::new(CollectionCache::new()),
        );

        let request = ReorderImagesRequest { image_ids: vec![ids[0], ids[0]] };
        let result = handler.reorder_images(&Uuid::new_v4(), &request).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn list_fetches_covers_in_one_batch() {
        let now = Utc::now();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let stored = move |id: Uuid, title: &str| Project {
            id,
            title: title.to_string(),
            slug: title.to_lowercase(),
            summary: None,
            content_markdown: String::new(),
            technologies: vec![],
            github_url: None,
            live_url: None,
            status: ContentStatus::Draft,
            display_order: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let mut project_repo = MockProjectRepository::new();
        project_repo
            .expect_list_projects()
            .returning(move |_| Ok(vec![stored(first, "Alpha"), stored(second, "Beta")]));
        project_repo.expect_count_projects().returning(|_| Ok(2));
        project_repo
            .expect_cover_images()
            .times(1)
            .withf(move |ids| ids == [first, second])
            .returning(move |_| {
                Ok(vec![ProjectImage {
                    id: Uuid::new_v4(),
                    project_id: first,
                    media_id: Uuid::new_v4(),
                    url: "http://cdn.test/cover.png".to_string(),
                    alt_text: "cover".to_string(),
                    caption: None,
                    display_order: 0,
                    created_at: now,
                }])
            });
        project_repo.expect_list_images().times(0);

        let handler = ProjectHandler::new(
            project_repo,
            MockMediaRepository::new(),
            Arc::new(CollectionCache::new()),
        );

        let filter = ProjectListFilter { page: 1, per_page: 20, ..Default::default() };
        let response = handler.list_projects(filter).await.unwrap();

        let projects = response["projects"].as_array().unwrap();
        assert_eq!(projects[0]["cover_url"], "http://cdn.test/cover.png");
        assert!(projects[1]["cover_url"].is_null());
    }

    #[tokio::test]
    async fn attach_with_blank_alt_text_is_rejected() {
        let mut project_repo = MockProjectRepository::new();
        project_repo.expect_attach_image().times(0);
        let mut media_repo = MockMediaRepository::new();
        media_repo.expect_get_media_asset_by_id().times(0);

        let handler = ProjectHandler::new(
            project_repo,
            media_repo,
            Arc::new(CollectionCache::new()),
        );

        let request = AttachImageRequest {
            media_id: Uuid::new_v4(),
            alt_text: "".to_string(),
            caption: None,
        };
        let result = handler.attach_image(&Uuid::new_v4(), request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
