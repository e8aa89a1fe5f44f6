use utoipa::OpenApi;

/// OpenAPI document of the REST surface, generated at compile time from the
/// handler annotations and served at `/api-docs/openapi.json`.
///
/// # Endpoints
/// - Health Check: `GET /api/v1/health`
/// - Email Validation: `GET /api/v1/validate-email`
/// - Bulk Email Validation: `POST /api/v1/bulk-validate-emails`
///
/// The GraphQL endpoint is not described here; its schema is introspectable
/// through `/api/v1/graphql` itself.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::email::validate_email,
        crate::routes::email::bulk_validate_emails,
    ),
    components(
        schemas(
            crate::models::HealthResponse,
            crate::models::BulkEmailsRequest,
            crate::models::EmailValidationResponse,
            crate::models::MxHost,
            crate::models::ErrorResponse,
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Email Validation", description = "Syntax, internationalization and deliverability checks"),
        (name = "GraphQL", description = "GraphQL API mirroring the REST endpoints")
    ),
    info(
        description = "Validates email addresses: RFC syntax, Unicode/IDNA normalization and MX/SPF lookups",
        title = "Email Validation API",
    )
)]
pub struct ApiDoc;
