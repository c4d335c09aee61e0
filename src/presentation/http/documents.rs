use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::error::AccessError;
use crate::application::use_cases::documents::create_document::CreateDocument;
use crate::application::use_cases::documents::delete_document::DeleteDocument;
use crate::application::use_cases::documents::get_document::{
    FindOwnedDocumentByName, GetVisibleDocument,
};
use crate::application::use_cases::documents::list_documents::ListVisibleDocuments;
use crate::bootstrap::app_context::AppContext;
use crate::domain::documents::document::{self as domain, Role};
use crate::presentation::http::auth::{self, Bearer};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<domain::Document> for Document {
    fn from(d: domain::Document) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            owner_id: d.owner_id,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisibleDocumentItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// admin | readOnly | readWrite
    #[schema(value_type = String)]
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub items: Vec<VisibleDocumentItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub name: String,
}

#[utoipa::path(get, path = "/api/documents", tag = "Documents",
    responses((status = 200, body = DocumentListResponse)))]
pub async fn list_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let repo = ctx.document_repo();
    let uc = ListVisibleDocuments {
        repo: repo.as_ref(),
    };
    let items = uc
        .execute(requester.id())
        .await?
        .into_iter()
        .map(|d| VisibleDocumentItem {
            id: d.doc_id,
            name: d.name,
            description: d.description,
            role: d.role,
        })
        .collect();
    Ok(Json(DocumentListResponse { items }))
}

#[utoipa::path(post, path = "/api/documents", tag = "Documents", request_body = CreateDocumentRequest, responses((status = 200, body = Document)))]
pub async fn create_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let repo = ctx.document_repo();
    let uc = CreateDocument {
        repo: repo.as_ref(),
    };
    let description = req.description.unwrap_or_default();
    let doc = uc
        .execute(requester.id(), req.name.trim(), &description)
        .await?;
    Ok(Json(doc.into()))
}

#[utoipa::path(get, path = "/api/documents/lookup", tag = "Documents",
    params(("name" = String, Query, description = "Name of a document owned by the caller")),
    responses((status = 200, body = Document), (status = 404)))]
pub async fn lookup_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(q): Query<LookupQuery>,
) -> Result<Json<Document>, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let repo = ctx.document_repo();
    let uc = FindOwnedDocumentByName {
        repo: repo.as_ref(),
    };
    let doc = uc
        .execute(requester.id(), &q.name)
        .await?
        .ok_or_else(AccessError::document_not_found)?;
    Ok(Json(doc.into()))
}

#[utoipa::path(get, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 200, body = Document), (status = 404)))]
pub async fn get_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let repo = ctx.document_repo();
    let uc = GetVisibleDocument {
        repo: repo.as_ref(),
    };
    // Callers without a role get the same answer as for a missing document
    let doc = uc
        .execute(requester.id(), id)
        .await?
        .ok_or_else(AccessError::document_not_found)?;
    Ok(Json(doc.into()))
}

#[utoipa::path(delete, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 204), (status = 403), (status = 404)))]
pub async fn delete_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let repo = ctx.document_repo();
    let uc = DeleteDocument {
        repo: repo.as_ref(),
    };
    uc.execute(id, requester.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/lookup", get(lookup_document))
        .route("/documents/:id", get(get_document).delete(delete_document))
        .with_state(ctx)
}
