use futures_util::future::join_all;
use uuid::Uuid;

use crate::application::access;
use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::documents::document::RoleAssignment;

pub const USER_NOT_FOUND: &str = "User not found";

pub struct ListRoleAssignments<'a, D, U>
where
    D: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub documents: &'a D,
    pub users: &'a U,
}

impl<'a, D, U> ListRoleAssignments<'a, D, U>
where
    D: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Read-only entries first, then read-write. A user that cannot be resolved keeps its slot
    /// with the `USER_NOT_FOUND` placeholder.
    pub async fn execute(
        &self,
        doc_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Vec<RoleAssignment>, AccessError> {
        let doc = access::require_owner(
            self.documents,
            doc_id,
            requester_id,
            "not allowed to view access",
        )
        .await?;

        // join_all yields results in input order regardless of completion order
        let lookups = doc.assignments().into_iter().map(|(role, user_id)| async move {
            let email = match self.users.find_by_id(user_id).await {
                Ok(Some(user)) => user.email,
                Ok(None) => USER_NOT_FOUND.to_string(),
                Err(e) => {
                    tracing::warn!(
                        document_id = %doc_id,
                        user_id = %user_id,
                        error = ?e,
                        "role_assignment_email_lookup_failed"
                    );
                    USER_NOT_FOUND.to_string()
                }
            };
            RoleAssignment { role, email }
        });
        Ok(join_all(lookups).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::application::ports::user_repository::UserRow;
    use crate::application::use_cases::documents::create_document::CreateDocument;
    use crate::application::use_cases::documents::list_documents::ListVisibleDocuments;
    use crate::application::use_cases::sharing::grant_role::GrantRole;
    use crate::domain::documents::document::{GrantableRole, Role, VisibleDocument};
    use crate::infrastructure::memory::{MemoryDocumentRepository, MemoryUserRepository};

    /// Directory whose lookups for one id always fail.
    struct FlakyDirectory {
        inner: MemoryUserRepository,
        broken: Uuid,
    }

    #[async_trait]
    impl UserRepository for FlakyDirectory {
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
            self.inner.find_by_email(email).await
        }
        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
            if id == self.broken {
                anyhow::bail!("directory unavailable");
            }
            self.inner.find_by_id(id).await
        }
    }

    #[tokio::test]
    async fn deleted_user_gets_placeholder() {
        let documents = MemoryDocumentRepository::default();
        let users = MemoryUserRepository::default();
        let owner = users.create_user("a@x.com", "A").await.unwrap().id;
        let reader = users.create_user("user@x.com", "R").await.unwrap().id;
        let writer = users.create_user("gone@x.com", "W").await.unwrap().id;
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadOnly, reader)
            .await
            .unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadWrite, writer)
            .await
            .unwrap();
        users.delete_user(writer).await.unwrap();

        let got = ListRoleAssignments {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, owner)
        .await
        .unwrap();
        assert_eq!(
            got,
            vec![
                RoleAssignment {
                    role: GrantableRole::ReadOnly,
                    email: "user@x.com".into(),
                },
                RoleAssignment {
                    role: GrantableRole::ReadWrite,
                    email: USER_NOT_FOUND.into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn lookup_error_does_not_fail_siblings() {
        let documents = MemoryDocumentRepository::default();
        let inner = MemoryUserRepository::default();
        let owner = inner.create_user("a@x.com", "A").await.unwrap().id;
        let broken = inner.create_user("b@x.com", "B").await.unwrap().id;
        let fine = inner.create_user("c@x.com", "C").await.unwrap().id;
        let users = FlakyDirectory { inner, broken };
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadOnly, broken)
            .await
            .unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadOnly, fine)
            .await
            .unwrap();

        let got = ListRoleAssignments {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, owner)
        .await
        .unwrap();
        let emails: Vec<&str> = got.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails, vec![USER_NOT_FOUND, "c@x.com"]);
    }

    #[tokio::test]
    async fn only_owner_may_list() {
        let documents = MemoryDocumentRepository::default();
        let users = MemoryUserRepository::default();
        let owner = users.create_user("a@x.com", "A").await.unwrap().id;
        let b = users.create_user("b@x.com", "B").await.unwrap().id;
        let doc = documents.insert(owner, "Spec", "v1").await.unwrap();
        documents
            .add_to_role_set(doc.id, GrantableRole::ReadWrite, b)
            .await
            .unwrap();
        let uc = ListRoleAssignments {
            documents: &documents,
            users: &users,
        };
        assert!(matches!(
            uc.execute(doc.id, b).await.unwrap_err(),
            AccessError::Unauthorized(_)
        ));
        assert!(matches!(
            uc.execute(Uuid::new_v4(), owner).await.unwrap_err(),
            AccessError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn share_then_list_scenario() {
        let documents = MemoryDocumentRepository::default();
        let users = MemoryUserRepository::default();
        let a = users.create_user("a@x.com", "A").await.unwrap().id;
        let b = users.create_user("b@x.com", "B").await.unwrap().id;

        let doc = CreateDocument { repo: &documents }
            .execute(a, "Spec", "v1")
            .await
            .unwrap();
        GrantRole {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, a, "b@x.com", GrantableRole::ReadWrite)
        .await
        .unwrap();

        let assignments = ListRoleAssignments {
            documents: &documents,
            users: &users,
        }
        .execute(doc.id, a)
        .await
        .unwrap();
        assert_eq!(
            assignments,
            vec![RoleAssignment {
                role: GrantableRole::ReadWrite,
                email: "b@x.com".into(),
            }]
        );

        let visible = ListVisibleDocuments { repo: &documents }
            .execute(b)
            .await
            .unwrap();
        assert_eq!(
            visible,
            vec![VisibleDocument {
                doc_id: doc.id,
                name: "Spec".into(),
                description: "v1".into(),
                role: Role::ReadWrite,
            }]
        );
    }
}
