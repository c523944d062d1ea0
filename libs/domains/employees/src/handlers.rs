use axum::{
    Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    ApiMessage, ApiResponse, AuditEvent, AuditOutcome, CurrentUser, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use domain_roles::RoleRepository;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{EmployeeError, EmployeeResult};
use crate::hasher::CredentialHasher;
use crate::models::{CreateEmployee, EmployeeView, LoginRequest, LoginResponse, UpdateEmployee};
use crate::repository::EmployeeRepository;
use crate::service::EmployeeService;

pub const TAG: &str = "Employees";
pub const AUTH_TAG: &str = "Auth";

/// OpenAPI documentation for the Employees and Auth APIs
#[derive(OpenApi)]
#[openapi(
    paths(
        list_employees,
        create_employee,
        get_employee,
        update_employee,
        delete_employee,
    ),
    components(
        schemas(EmployeeView, CreateEmployee, UpdateEmployee),
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
        (name = TAG, description = "Employee records")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(login),
    components(schemas(LoginRequest, LoginResponse)),
    tags(
        (name = AUTH_TAG, description = "Credential exchange")
    )
)]
pub struct AuthApiDoc;

type SharedService<E, R, H> = Arc<EmployeeService<E, R, H>>;

/// Employee routes. Expects the caller to layer the session middleware on top.
pub fn router<E, R, H>(service: SharedService<E, R, H>) -> Router
where
    E: EmployeeRepository + 'static,
    R: RoleRepository + 'static,
    H: CredentialHasher + 'static,
{
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/{id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .with_state(service)
}

/// Public login route.
pub fn auth_router<E, R, H>(service: SharedService<E, R, H>) -> Router
where
    E: EmployeeRepository + 'static,
    R: RoleRepository + 'static,
    H: CredentialHasher + 'static,
{
    Router::new()
        .route("/login", post(login))
        .with_state(service)
}

/// Log in with email and password
///
/// The token is returned in the body and in the `Authorization` header.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<E, R, H>(
    State(service): State<SharedService<E, R, H>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> EmployeeResult<Response>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    let email = input.email.trim().to_lowercase();

    match service.login(input).await {
        Ok(session) => {
            AuditEvent::new("auth.login", AuditOutcome::Success)
                .user_id(session.user.id.to_string())
                .with_request(&headers)
                .log();

            let bearer = HeaderValue::from_str(&format!("Bearer {}", session.token))
                .map_err(|e| EmployeeError::Internal(e.to_string()))?;
            let mut response = ApiResponse::new("Login successful", session).ok();
            response.headers_mut().insert(AUTHORIZATION, bearer);
            Ok(response)
        }
        Err(EmployeeError::InvalidCredentials) => {
            AuditEvent::new("auth.login", AuditOutcome::Failure)
                .with_request(&headers)
                .with_details(json!({ "email": email }))
                .log();
            Err(EmployeeError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}

/// List all employees with their roles
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All employees", body = ApiResponse<Vec<EmployeeView>>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_employees<E, R, H>(
    State(service): State<SharedService<E, R, H>>,
) -> EmployeeResult<Response>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    let employees = service.find_all().await?;
    Ok(ApiResponse::new("Employees retrieved successfully", employees).ok())
}

/// Create an employee
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = ApiResponse<EmployeeView>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_employee<E, R, H>(
    State(service): State<SharedService<E, R, H>>,
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateEmployee>,
) -> EmployeeResult<Response>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    let employee = service.create(input).await?;

    AuditEvent::new("employee.create", AuditOutcome::Success)
        .actor(Some(&claims))
        .resource(format!("employee:{}", employee.id))
        .with_request(&headers)
        .with_details(json!({ "role_id": employee.role.id }))
        .log();

    Ok(ApiResponse::new("Employee created successfully", employee).created())
}

/// Get an employee by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee found", body = ApiResponse<EmployeeView>),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_employee<E, R, H>(
    State(service): State<SharedService<E, R, H>>,
    IdPath(id): IdPath,
) -> EmployeeResult<Response>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    let employee = service.find_by_id(id).await?;
    Ok(ApiResponse::new("Employee retrieved successfully", employee).ok())
}

/// Update some fields of an employee
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee id")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = ApiMessage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_employee<E, R, H>(
    State(service): State<SharedService<E, R, H>>,
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateEmployee>,
) -> EmployeeResult<Response>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    let password_changed = input.password.is_some();

    if !service.update(id, input).await? {
        return Err(EmployeeError::NotFound(id));
    }

    AuditEvent::new("employee.update", AuditOutcome::Success)
        .actor(Some(&claims))
        .resource(format!("employee:{id}"))
        .with_request(&headers)
        .with_details(json!({ "password_changed": password_changed }))
        .log();

    Ok(ApiMessage::new("Employee updated successfully").into_response())
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = ApiMessage),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_employee<E, R, H>(
    State(service): State<SharedService<E, R, H>>,
    CurrentUser(claims): CurrentUser,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> EmployeeResult<Response>
where
    E: EmployeeRepository,
    R: RoleRepository,
    H: CredentialHasher,
{
    if !service.delete(id).await? {
        return Err(EmployeeError::NotFound(id));
    }

    AuditEvent::new("employee.delete", AuditOutcome::Success)
        .actor(Some(&claims))
        .resource(format!("employee:{id}"))
        .with_request(&headers)
        .log();

    Ok(ApiMessage::new("Employee deleted successfully").into_response())
}
