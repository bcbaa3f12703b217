use std::sync::Arc;

use uuid::Uuid;

use crate::{
    domain::navigation::AdminSection,
    entities::contact::{
        ContactMessage, ContactMessageInsert, ContactMessageListResponse,
        ContactMessageReceivedResponse, NewContactMessageRequest,
    },
    errors::AppError,
    infrastructure::cache::CollectionCache,
    repositories::contact::ContactRepository,
};

pub struct ContactHandler<R>
where
    R: ContactRepository,
{
    pub contact_repo: R,
    pub cache: Arc<CollectionCache>,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository,
{
    pub fn new(contact_repo: R, cache: Arc<CollectionCache>) -> Self {
        ContactHandler { contact_repo, cache }
    }

    /// Public submission endpoint behind the contact form.
    pub async fn submit_message(
        &self,
        request: NewContactMessageRequest,
    ) -> Result<ContactMessageReceivedResponse, AppError> {
        let insert = ContactMessageInsert::try_from(request)?;

        let id = self.contact_repo.create_contact_message(&insert).await?;
        self.cache.invalidate_section(AdminSection::Messages);

        Ok(ContactMessageReceivedResponse {
            id,
            message: "Thanks for reaching out. I'll get back to you soon.".to_string(),
        })
    }

    pub async fn list_messages(&self) -> Result<ContactMessageListResponse, AppError> {
        let (messages, total, unread) = futures::try_join!(
            self.contact_repo.list_contact_messages(),
            self.contact_repo.count_contact_messages(),
            self.contact_repo.count_unread_messages(),
        )?;

        Ok(ContactMessageListResponse { messages, total, unread })
    }

    /// Opening a message in the admin panel marks it read.
    pub async fn read_message(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        let message = self
            .contact_repo
            .mark_message_read(id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Message not found".to_string()),
                _ => e,
            })?;

        self.cache.invalidate_section(AdminSection::Messages);
        Ok(message)
    }

    pub async fn delete_message(&self, id: &Uuid, hard_delete: bool) -> Result<(), AppError> {
        match hard_delete {
            true => self.contact_repo.hard_delete_contact_message(id).await,
            false => self.contact_repo.soft_delete_contact_message(id).await,
        }
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Message not found".to_string()),
            _ => e,
        })?;

        self.cache.invalidate_section(AdminSection::Messages);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::contact::MockContactRepository;

    fn handler(repo: MockContactRepository) -> ContactHandler<MockContactRepository> {
        ContactHandler::new(repo, Arc::new(CollectionCache::new()))
    }

    #[tokio::test]
    async fn submission_returns_acknowledgement() {
        let id = Uuid::new_v4();
        let mut repo = MockContactRepository::new();
        repo.expect_create_contact_message()
            .times(1)
            .returning(move |_| Ok(id));

        let request = NewContactMessageRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: None,
            message: "I have a project in mind.".to_string(),
        };
        let response = handler(repo).submit_message(request).await.unwrap();
        assert_eq!(response.id, id);
        assert!(!response.message.is_empty());
    }

    #[tokio::test]
    async fn invalid_submission_never_reaches_the_repository() {
        let mut repo = MockContactRepository::new();
        repo.expect_create_contact_message().times(0);

        let request = NewContactMessageRequest {
            name: "A".to_string(),
            email: "ada@example.com".to_string(),
            subject: None,
            message: "I have a project in mind.".to_string(),
        };
        let result = handler(repo).submit_message(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn list_includes_unread_count() {
        let mut repo = MockContactRepository::new();
        repo.expect_list_contact_messages().returning(|| Ok(vec![]));
        repo.expect_count_contact_messages().returning(|| Ok(12));
        repo.expect_count_unread_messages().returning(|| Ok(3));

        let response = handler(repo).list_messages().await.unwrap();
        assert_eq!(response.total, 12);
        assert_eq!(response.unread, 3);
    }
}
