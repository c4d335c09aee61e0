//! In-process adapters for both ports. Used by `STORE_BACKEND=memory` and by the test suites.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::documents::document::{Document as DomainDocument, GrantableRole};

// Kept in insertion order so listings come out oldest first.
#[derive(Default)]
pub struct MemoryDocumentRepository {
    docs: RwLock<Vec<DomainDocument>>,
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> anyhow::Result<DomainDocument> {
        let now = chrono::Utc::now();
        let doc = DomainDocument {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            owner_id,
            read_only_users: Vec::new(),
            read_write_users: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.docs.write().await.push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_name_and_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .find(|d| d.owner_id == owner_id && d.name == name)
            .cloned())
    }

    async fn list_visible_to(&self, user_id: Uuid) -> anyhow::Result<Vec<DomainDocument>> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|d| d.effective_role(user_id).is_some())
            .cloned()
            .collect())
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() != before)
    }

    async fn add_to_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        let set = doc.role_set_mut(role);
        if !set.contains(&user_id) {
            set.push(user_id);
        }
        doc.updated_at = chrono::Utc::now();
        Ok(true)
    }

    async fn remove_from_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        doc.role_set_mut(role).retain(|u| *u != user_id);
        doc.updated_at = chrono::Utc::now();
        Ok(true)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<UserRow>>,
}

impl MemoryUserRepository {
    /// Registers a user; the directory port itself is read-only.
    pub async fn create_user(&self, email: &str, name: &str) -> anyhow::Result<UserRow> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            anyhow::bail!("email already registered");
        }
        let row = UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
        };
        users.push(row.clone());
        Ok(row)
    }

    pub async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

/// Hands out the document once, then deletes it before the caller's next write lands.
#[cfg(test)]
pub(crate) struct DeletedAfterLoad {
    pub inner: MemoryDocumentRepository,
}

#[cfg(test)]
#[async_trait]
impl DocumentRepository for DeletedAfterLoad {
    async fn insert(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> anyhow::Result<DomainDocument> {
        self.inner.insert(owner_id, name, description).await
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>> {
        let doc = self.inner.find_by_id(id).await?;
        self.inner.remove(id).await?;
        Ok(doc)
    }

    async fn find_by_name_and_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> anyhow::Result<Option<DomainDocument>> {
        self.inner.find_by_name_and_owner(name, owner_id).await
    }

    async fn list_visible_to(&self, user_id: Uuid) -> anyhow::Result<Vec<DomainDocument>> {
        self.inner.list_visible_to(user_id).await
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<bool> {
        self.inner.remove(id).await
    }

    async fn add_to_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool> {
        self.inner.add_to_role_set(id, role, user_id).await
    }

    async fn remove_from_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool> {
        self.inner.remove_from_role_set(id, role, user_id).await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
