use actix_web::{HttpResponse, Responder, get, http::header, web};

const VALIDATION_FORM: &str = include_str!("../../static/show-email-validation-form.html");

/// Sends visitors of the bare host to the interactive API docs.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, "/swagger-ui/"))
        .finish()
}

/// A small HTML form driving `GET /api/v1/validate-email`.
#[get("/show-email-validation-form")]
pub async fn show_email_validation_form() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(VALIDATION_FORM)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(show_email_validation_form);
}
