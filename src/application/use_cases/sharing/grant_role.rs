use uuid::Uuid;

use crate::application::access;
use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::documents::document::GrantableRole;

pub const CHANGE_ACCESS_DENIED: &str = "not allowed to change access";

pub struct GrantRole<'a, D, U>
where
    D: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub documents: &'a D,
    pub users: &'a U,
}

impl<'a, D, U> GrantRole<'a, D, U>
where
    D: DocumentRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Moves the grantee into `role`, dropping any membership in the other role set first.
    pub async fn execute(
        &self,
        doc_id: Uuid,
        granter_id: Uuid,
        grantee_email: &str,
        role: GrantableRole,
    ) -> Result<(), AccessError> {
        let doc =
            access::require_owner(self.documents, doc_id, granter_id, CHANGE_ACCESS_DENIED).await?;
        let grantee = access::resolve_email(self.users, grantee_email).await?;
        if doc.is_owned_by(grantee.id) {
            return Err(AccessError::Conflict(
                "owner already has admin access".into(),
            ));
        }

        // Both writes are idempotent in the store; a false result means the document was deleted
        // after the ownership check.
        let opposite = role.opposite();
        let still_there = self
            .documents
            .remove_from_role_set(doc_id, opposite, grantee.id)
            .await
            .map_err(AccessError::Persistence)?
            && self
                .documents
                .add_to_role_set(doc_id, role, grantee.id)
                .await
                .map_err(AccessError::Persistence)?;
        if !still_there {
            return Err(AccessError::document_not_found());
        }
        tracing::info!(
            document_id = %doc_id,
            grantee = %grantee.id,
            role = role.as_str(),
            "role_granted"
        );
        Ok(())
    }
}
