use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::sharing::grant_role::GrantRole;
use crate::application::use_cases::sharing::list_role_assignments::ListRoleAssignments;
use crate::application::use_cases::sharing::remove_role::RemoveRole;
use crate::bootstrap::app_context::AppContext;
use crate::domain::documents::document::GrantableRole;
use crate::presentation::http::auth::{self, Bearer};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleAssignmentItem {
    /// readOnly | readWrite
    #[schema(value_type = String)]
    pub role: GrantableRole,
    /// "User not found" when the user no longer exists
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleChangeRequest {
    pub email: String,
    /// readOnly | readWrite
    #[schema(value_type = String)]
    pub role: GrantableRole,
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/access",
    tag = "Sharing",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 200, body = [RoleAssignmentItem]), (status = 403), (status = 404))
)]
pub async fn list_role_assignments(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RoleAssignmentItem>>, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let documents = ctx.document_repo();
    let users = ctx.user_repo();
    let uc = ListRoleAssignments {
        documents: documents.as_ref(),
        users: users.as_ref(),
    };
    let items = uc
        .execute(id, requester.id())
        .await?
        .into_iter()
        .map(|a| RoleAssignmentItem {
            role: a.role,
            email: a.email,
        })
        .collect();
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/documents/{id}/access",
    tag = "Sharing",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = RoleChangeRequest,
    responses((status = 204), (status = 403), (status = 404), (status = 409))
)]
pub async fn grant_role(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleChangeRequest>,
) -> Result<StatusCode, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let documents = ctx.document_repo();
    let users = ctx.user_repo();
    let uc = GrantRole {
        documents: documents.as_ref(),
        users: users.as_ref(),
    };
    uc.execute(id, requester.id(), &req.email, req.role)
        .await
        .map_err(|e| {
            tracing::debug!(document_id = %id, error = ?e, "grant_role_failed");
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}/access",
    tag = "Sharing",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = RoleChangeRequest,
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn remove_role(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleChangeRequest>,
) -> Result<StatusCode, ApiError> {
    let requester = auth::requester(&ctx.cfg, bearer)?;
    let documents = ctx.document_repo();
    let users = ctx.user_repo();
    let uc = RemoveRole {
        documents: documents.as_ref(),
        users: users.as_ref(),
    };
    uc.execute(id, requester.id(), &req.email, req.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/documents/:id/access",
            get(list_role_assignments)
                .post(grant_role)
                .delete(remove_role),
        )
        .with_state(ctx)
}
