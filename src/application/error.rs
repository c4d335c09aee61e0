#[derive(thiserror::Error, Debug)]
pub enum AccessError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("document store operation failed")]
    Persistence(#[source] anyhow::Error),
}

impl AccessError {
    pub fn document_not_found() -> Self {
        AccessError::NotFound("document not found".into())
    }

    pub fn email_not_registered() -> Self {
        AccessError::NotFound("email not registered".into())
    }
}
