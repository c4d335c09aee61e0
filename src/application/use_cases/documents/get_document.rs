use uuid::Uuid;

use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::Document as DomainDocument;

pub struct GetDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> GetDocument<'a, R> {
    // Absence is Ok(None); only store failures are errors
    pub async fn execute(&self, id: Uuid) -> Result<Option<DomainDocument>, AccessError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(AccessError::Persistence)
    }
}

/// Like [`GetDocument`], but hides documents the requester holds no role on.
pub struct GetVisibleDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> GetVisibleDocument<'a, R> {
    pub async fn execute(
        &self,
        requester_id: Uuid,
        id: Uuid,
    ) -> Result<Option<DomainDocument>, AccessError> {
        let doc = GetDocument { repo: self.repo }.execute(id).await?;
        Ok(doc.filter(|d| d.effective_role(requester_id).is_some()))
    }
}

pub struct FindOwnedDocumentByName<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> FindOwnedDocumentByName<'a, R> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Option<DomainDocument>, AccessError> {
        self.repo
            .find_by_name_and_owner(name, owner_id)
            .await
            .map_err(AccessError::Persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::documents::document::GrantableRole;
    use crate::infrastructure::memory::MemoryDocumentRepository;

    #[tokio::test]
    async fn unknown_id_is_none_not_error() {
        let repo = MemoryDocumentRepository::default();
        let got = GetDocument { repo: &repo }
            .execute(Uuid::new_v4())
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn owner_finds_document_by_name() {
        let repo = MemoryDocumentRepository::default();
        let owner = Uuid::new_v4();
        let doc = repo.insert(owner, "Spec", "v1").await.unwrap();
        let uc = FindOwnedDocumentByName { repo: &repo };
        assert_eq!(uc.execute(owner, "Spec").await.unwrap().map(|d| d.id), Some(doc.id));
        assert!(uc.execute(Uuid::new_v4(), "Spec").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn visible_only_to_owner_and_members() {
        let repo = MemoryDocumentRepository::default();
        let owner = Uuid::new_v4();
        let (reader, writer, stranger) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let doc = repo.insert(owner, "Spec", "v1").await.unwrap();
        repo.add_to_role_set(doc.id, GrantableRole::ReadOnly, reader)
            .await
            .unwrap();
        repo.add_to_role_set(doc.id, GrantableRole::ReadWrite, writer)
            .await
            .unwrap();
        let uc = GetVisibleDocument { repo: &repo };
        for user in [owner, reader, writer] {
            let got = uc.execute(user, doc.id).await.unwrap();
            assert_eq!(got.map(|d| d.id), Some(doc.id));
        }
        assert!(uc.execute(stranger, doc.id).await.unwrap().is_none());
        assert!(uc.execute(owner, Uuid::new_v4()).await.unwrap().is_none());
    }
}
