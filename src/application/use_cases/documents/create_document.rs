use uuid::Uuid;

use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::Document as DomainDocument;

pub struct CreateDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> CreateDocument<'a, R> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<DomainDocument, AccessError> {
        let doc = self
            .repo
            .insert(owner_id, name, description)
            .await
            .map_err(AccessError::Persistence)?;
        tracing::info!(document_id = %doc.id, owner_id = %owner_id, "document_created");
        Ok(doc)
    }
}
