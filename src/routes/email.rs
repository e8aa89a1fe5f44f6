use crate::models::{
    BulkEmailsRequest, EmailValidationResponse, ErrorResponse, ValidateEmailQuery,
    ValidationOptionsQuery,
};
use crate::validation::{EmailValidator, MAX_BULK_EMAILS};
use actix_web::{HttpResponse, Responder, get, post, web};

/// # Email Validation Endpoint
///
/// Validates one address: syntax, Unicode/IDNA normalization and, unless
/// `check_deliverability=false`, the MX and SPF records of its domain.
///
/// An invalid address is still a `200 OK`; the verdict is in the body.
///
/// ## Example Request
/// ```text
/// GET /api/v1/validate-email?email=user@example.com&check_deliverability=false
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/validate-email",
    params(ValidateEmailQuery),
    responses(
        (status = 200, description = "Validation result", body = EmailValidationResponse),
        (status = 400, description = "Missing or malformed query string")
    ),
    tag = "Email Validation"
)]
#[get("/validate-email")]
pub async fn validate_email(
    query: web::Query<ValidateEmailQuery>,
    validator: web::Data<EmailValidator>,
) -> impl Responder {
    let ValidateEmailQuery {
        email,
        check_deliverability,
    } = query.into_inner();

    let result = validator.validate(&email, check_deliverability).await;
    tracing::info!(valid = result.is_valid(), check_deliverability, "validated email");

    HttpResponse::Ok().json(EmailValidationResponse::from(result))
}

/// # Bulk Email Validation Endpoint
///
/// Validates up to 10 addresses concurrently. Results come back in the order
/// of the request.
///
/// ## Responses
/// - **200 OK**: array of validation results
/// - **406 Not Acceptable**: more than 10 addresses, nothing validated
///
/// ## Example Request
/// ```json
/// { "emails": ["user1@example.com", "not-an-email"] }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/bulk-validate-emails",
    request_body = BulkEmailsRequest,
    params(ValidationOptionsQuery),
    responses(
        (status = 200, description = "Validation results in request order", body = [EmailValidationResponse]),
        (status = 406, description = "Too many addresses", body = ErrorResponse)
    ),
    tag = "Email Validation"
)]
#[post("/bulk-validate-emails")]
pub async fn bulk_validate_emails(
    req: web::Json<BulkEmailsRequest>,
    query: web::Query<ValidationOptionsQuery>,
    validator: web::Data<EmailValidator>,
) -> impl Responder {
    match validator
        .validate_many(&req.emails, MAX_BULK_EMAILS, query.check_deliverability)
        .await
    {
        Ok(results) => {
            let body: Vec<EmailValidationResponse> =
                results.into_iter().map(EmailValidationResponse::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(kind) => HttpResponse::NotAcceptable().json(ErrorResponse::new(
            format!("Max {MAX_BULK_EMAILS} emails can be validated."),
            kind,
        )),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(validate_email).service(bulk_validate_emails);
}
