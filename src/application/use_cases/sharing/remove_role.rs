use uuid::Uuid;

use crate::application::access;
use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::sharing::grant_role::CHANGE_ACCESS_DENIED;
use crate::domain::documents::document::GrantableRole;

pub struct RemoveRole<'a, D, U>
where
    D: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub documents: &'a D,
    pub users: &'a U,
}

impl<'a, D, U> RemoveRole<'a, D, U>
where
    D: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub async fn execute(
        &self,
        doc_id: Uuid,
        remover_id: Uuid,
        grantee_email: &str,
        role: GrantableRole,
    ) -> Result<(), AccessError> {
        access::require_owner(self.documents, doc_id, remover_id, CHANGE_ACCESS_DENIED).await?;
        let grantee = access::resolve_email(self.users, grantee_email).await?;
        let still_there = self
            .documents
            .remove_from_role_set(doc_id, role, grantee.id)
            .await
            .map_err(AccessError::Persistence)?;
        if !still_there {
            return Err(AccessError::document_not_found());
        }
        tracing::info!(
            document_id = %doc_id,
            grantee = %grantee.id,
            role = role.as_str(),
            "role_removed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::{
        DeletedAfterLoad, MemoryDocumentRepository, MemoryUserRepository,
    };

    #[tokio::test]
    async fn removes_only_the_named_role() {
        let documents = MemoryDocumentRepository::default();
        let users = MemoryUserRepository::default();
        let owner = users.create_user("a@x.com", "A").await.unwrap().id;
        let b = users.create_user("b@x.com", "B").await.unwrap().id;
        let c = users.create_user("c@x.com", "C").await.unwrap().id;
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadOnly, b)
            .await
            .unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadWrite, c)
            .await
            .unwrap();

        RemoveRole {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, owner, "b@x.com", GrantableRole::ReadOnly)
        .await
        .unwrap();

        let doc = documents.find_by_id(doc.id).await.unwrap().unwrap();
        assert!(doc.read_only_users.is_empty());
        assert_eq!(doc.read_write_users, vec![c]);
    }

    #[tokio::test]
    async fn absent_member_is_a_no_op() {
        let documents = MemoryDocumentRepository::default();
        let users = MemoryUserRepository::default();
        let owner = users.create_user("a@x.com", "A").await.unwrap().id;
        let b = users.create_user("b@x.com", "B").await.unwrap().id;
        users.create_user("c@x.com", "C").await.unwrap();
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadWrite, b)
            .await
            .unwrap();
        let before = documents.find_by_id(doc.id).await.unwrap().unwrap();

        RemoveRole {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, owner, "c@x.com", GrantableRole::ReadWrite)
        .await
        .unwrap();

        let after = documents.find_by_id(doc.id).await.unwrap().unwrap();
        assert_eq!(before.read_only_users, after.read_only_users);
        assert_eq!(before.read_write_users, after.read_write_users);
    }

    #[tokio::test]
    async fn non_owner_cannot_remove_whatever_role_they_hold() {
        for held in [None, Some(GrantableRole::ReadOnly), Some(GrantableRole::ReadWrite)] {
            let documents = MemoryDocumentRepository::default();
            let users = MemoryUserRepository::default();
            let owner = users.create_user("a@x.com", "A").await.unwrap().id;
            let b = users.create_user("b@x.com", "B").await.unwrap().id;
            let c = users.create_user("c@x.com", "C").await.unwrap().id;
            let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
            documents
                .add_to_role_set(doc.id, GrantableRole::ReadOnly, c)
                .await
                .unwrap();
            if let Some(role) = held {
                documents.add_to_role_set(doc.id, role, b).await.unwrap();
            }
            let err = RemoveRole {
                documents: &documents,
                users: &users,
            }
            .execute(doc.id, b, "c@x.com", GrantableRole::ReadOnly)
            .await
            .unwrap_err();
            assert!(
                matches!(err, AccessError::Unauthorized(_)),
                "held {held:?}: {err:?}"
            );
            let doc = documents.find_by_id(doc.id).await.unwrap().unwrap();
            assert!(doc.read_only_users.contains(&c));
        }
    }

    #[tokio::test]
    async fn document_deleted_mid_removal_is_not_found() {
        let users = MemoryUserRepository::default();
        let owner = users.create_user("a@x.com", "A").await.unwrap().id;
        users.create_user("b@x.com", "B").await.unwrap();
        let documents = DeletedAfterLoad {
            inner: MemoryDocumentRepository::default(),
        };
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        let err = RemoveRole {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, owner, "b@x.com", GrantableRole::ReadOnly)
        .await
        .unwrap_err();
        assert!(matches!(err, AccessError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let documents = MemoryDocumentRepository::default();
        let users = MemoryUserRepository::default();
        let owner = users.create_user("a@x.com", "A").await.unwrap().id;
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        let err = RemoveRole {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, owner, "ghost@x.com", GrantableRole::ReadOnly)
        .await
        .unwrap_err();
        assert!(matches!(err, AccessError::NotFound(_)));
    }
}
