use uuid::Uuid;

use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::VisibleDocument;

pub struct ListVisibleDocuments<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> ListVisibleDocuments<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<VisibleDocument>, AccessError> {
        let docs = self
            .repo
            .list_visible_to(user_id)
            .await
            .map_err(AccessError::Persistence)?;
        // The store filter and the role computation agree; anything without a role is skipped.
        Ok(docs
            .into_iter()
            .filter_map(|d| {
                let role = d.effective_role(user_id)?;
                Some(VisibleDocument {
                    doc_id: d.id,
                    name: d.name,
                    description: d.description,
                    role,
                })
            })
            .collect())
    }
}
