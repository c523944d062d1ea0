//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "An internal server error occurred",
        "error": { "code": 5001, "type": "INTERNAL_ERROR" }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Request validation failed",
        "error": {
            "code": 1001,
            "type": "VALIDATION_ERROR",
            "details": {
                "name": [{
                    "code": "role_name",
                    "message": "Role name must be between 3 and 64 characters",
                    "params": {"value": "ab"}
                }]
            }
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid identifier",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Identifier must be a positive integer",
        "error": { "code": 1002, "type": "INVALID_ID", "details": { "id": "abc" } }
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Resource not found",
        "error": { "code": 1004, "type": "NOT_FOUND" }
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing, invalid or expired token",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Authentication required",
        "error": { "code": 1006, "type": "UNAUTHORIZED" }
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource already exists",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Resource already exists",
        "error": { "code": 1008, "type": "CONFLICT" }
    })
)]
pub struct ConflictResponse(pub ErrorResponse);
