use axum::{
    Router,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    ApiMessage, ApiResponse, AuditEvent, AuditOutcome, CurrentUser, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{RoleError, RoleResult};
use crate::models::{CreateRole, Role, UpdateRole};
use crate::repository::RoleRepository;
use crate::service::RoleService;

pub const TAG: &str = "Roles";

/// OpenAPI documentation for Roles API
#[derive(OpenApi)]
#[openapi(
    paths(list_roles, create_role, get_role, update_role, delete_role),
    components(
        schemas(Role, CreateRole, UpdateRole),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Job roles employees are assigned to")
    )
)]
pub struct ApiDoc;

/// Role routes. Expects the caller to layer the session middleware on top.
pub fn router<R: RoleRepository + 'static>(service: RoleService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/{id}", get(get_role).put(update_role).delete(delete_role))
        .with_state(shared_service)
}

/// List all roles
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All roles", body = ApiResponse<Vec<Role>>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_roles<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
) -> RoleResult<Response> {
    let roles = service.list().await?;
    Ok(ApiResponse::new("Roles retrieved successfully", roles).ok())
}

/// Create a role
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<Role>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateRole>,
) -> RoleResult<Response> {
    let role = service.create(input).await?;

    AuditEvent::new("role.create", AuditOutcome::Success)
        .actor(Some(&claims))
        .resource(format!("role:{}", role.id))
        .with_request(&headers)
        .with_details(&role)
        .log();

    Ok(ApiResponse::new("Role created successfully", role).created())
}

/// Get a role by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Role id")
    ),
    responses(
        (status = 200, description = "Role found", body = ApiResponse<Role>),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    IdPath(id): IdPath,
) -> RoleResult<Response> {
    let role = service.get_by_id(id).await?;
    Ok(ApiResponse::new("Role retrieved successfully", role).ok())
}

/// Rename a role
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Role id")
    ),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = ApiMessage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateRole>,
) -> RoleResult<Response> {
    if !service.update(id, input).await? {
        return Err(RoleError::NotFound(id));
    }

    AuditEvent::new("role.update", AuditOutcome::Success)
        .actor(Some(&claims))
        .resource(format!("role:{id}"))
        .with_request(&headers)
        .log();

    Ok(ApiMessage::new("Role updated successfully").into_response())
}

/// Delete a role
///
/// Fails with 409 while employees are still assigned to it.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Role id")
    ),
    responses(
        (status = 200, description = "Role deleted", body = ApiMessage),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> RoleResult<Response> {
    let outcome = service.delete(id).await;

    let audit = AuditEvent::new("role.delete", AuditOutcome::Success)
        .actor(Some(&claims))
        .resource(format!("role:{id}"))
        .with_request(&headers);

    match outcome {
        Ok(true) => {
            audit.log();
            Ok(ApiMessage::new("Role deleted successfully").into_response())
        }
        Ok(false) => Err(RoleError::NotFound(id)),
        Err(RoleError::InUse(id)) => {
            AuditEvent {
                outcome: AuditOutcome::Denied,
                ..audit
            }
            .log();
            Err(RoleError::InUse(id))
        }
        Err(e) => Err(e),
    }
}
