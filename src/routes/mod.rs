use actix_web::web;

/// # Health Check Endpoint
///
/// `GET /health` reports status, timestamp and version.
pub mod health;

/// # Email Validation Endpoints
///
/// - `GET /validate-email`: one address, options in the query string
/// - `POST /bulk-validate-emails`: up to 10 addresses in a JSON body
///
/// Both return the same per-address result shape and check deliverability
/// unless `check_deliverability=false` is passed.
pub mod email;

/// GraphQL endpoint and playground.
pub mod graphql;

/// Root redirect and the HTML validation form.
pub mod pages;

/// # API Route Configuration
///
/// Sets up versioned API endpoints under the `/api/v1` base path, plus the
/// unversioned pages at the root.
///
/// ## Example Endpoints
///
/// ```text
/// GET  /api/v1/health
/// GET  /api/v1/validate-email?email=user@example.com
/// POST /api/v1/bulk-validate-emails
/// POST /api/v1/graphql
/// GET  /show-email-validation-form
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure_routes)
            .configure(email::configure_routes)
            .configure(graphql::configure_routes),
    )
    .configure(pages::configure_routes);
}
