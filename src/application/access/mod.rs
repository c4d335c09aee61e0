use uuid::Uuid;

use crate::application::error::AccessError;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::documents::document::Document as DomainDocument;

/// Authenticated caller. The presentation layer builds it from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub Uuid);

impl Requester {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

pub async fn load_document<R>(repo: &R, doc_id: Uuid) -> Result<DomainDocument, AccessError>
where
    R: DocumentRepository + ?Sized,
{
    repo.find_by_id(doc_id)
        .await
        .map_err(AccessError::Persistence)?
        .ok_or_else(AccessError::document_not_found)
}

/// Loads the document and checks that `requester` owns it.
pub async fn require_owner<R>(
    repo: &R,
    doc_id: Uuid,
    requester: Uuid,
    denied: &str,
) -> Result<DomainDocument, AccessError>
where
    R: DocumentRepository + ?Sized,
{
    let doc = load_document(repo, doc_id).await?;
    if !doc.is_owned_by(requester) {
        tracing::warn!(document_id = %doc_id, requester = %requester, "owner_check_denied");
        return Err(AccessError::Unauthorized(denied.to_string()));
    }
    Ok(doc)
}

pub async fn resolve_email<U>(users: &U, email: &str) -> Result<UserRow, AccessError>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_email(email.trim())
        .await
        .map_err(AccessError::Persistence)?
        .ok_or_else(AccessError::email_not_registered)
}
