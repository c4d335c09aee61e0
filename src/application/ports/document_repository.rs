use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::documents::document::{Document as DomainDocument, GrantableRole};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> anyhow::Result<DomainDocument>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>>;

    // Oldest match wins when an owner reuses a name
    async fn find_by_name_and_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> anyhow::Result<Option<DomainDocument>>;

    /// Documents owned by `user_id` or listing it in either role set, oldest first.
    async fn list_visible_to(&self, user_id: Uuid) -> anyhow::Result<Vec<DomainDocument>>;

    // Returns false when nothing was removed
    async fn remove(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Appends `user_id` to the role set unless already present.
    /// Returns false when the document no longer exists.
    async fn add_to_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool>;

    // Absent members are left alone; false only when the document is gone
    async fn remove_from_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool>;

    async fn ping(&self) -> anyhow::Result<()>;
}
