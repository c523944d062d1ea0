use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by the protected operations.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Every successful response carries a renewed token in `Authorization`",
                    ))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAuth),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "HR API",
        version = "0.1.0",
        description = "Employees, job roles and session tokens"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/auth", api = domain_employees::handlers::AuthApiDoc),
        (path = "/roles", api = domain_roles::handlers::ApiDoc),
        (path = "/employees", api = domain_employees::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
