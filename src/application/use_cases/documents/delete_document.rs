use uuid::Uuid;

use crate::application::access;
use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;

pub struct DeleteDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> DeleteDocument<'a, R> {
    pub async fn execute(&self, id: Uuid, requester_id: Uuid) -> Result<(), AccessError> {
        access::require_owner(self.repo, id, requester_id, "not allowed to delete document")
            .await?;
        let removed = self
            .repo
            .remove(id)
            .await
            .map_err(AccessError::Persistence)?;
        if !removed {
            // Lost a race with another delete
            return Err(AccessError::document_not_found());
        }
        tracing::info!(document_id = %id, "document_deleted");
        Ok(())
    }
}
