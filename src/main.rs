use actix_web::{App, HttpServer, middleware::Logger, web::Data};
use email_validation_api::config::AppConfig;
use email_validation_api::graphql::schema::create_schema;
use email_validation_api::openapi::ApiDoc;
use email_validation_api::validation::{DnsResolver, EmailValidator, RecordsCache};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Email Validation Service Entry Point
///
/// # Endpoints
/// - REST: `/api/v1/validate-email`, `/api/v1/bulk-validate-emails`, `/api/v1/health`
/// - GraphQL: `/api/v1/graphql`, playground at `/api/v1/playground`
/// - Swagger UI: `/swagger-ui/`, OpenAPI spec at `/api-docs/openapi.json`
/// - HTML form: `/show-email-validation-form`
///
/// Configuration comes from the environment, see [`AppConfig::from_env`].
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "email_validation_api=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    tracing::info!(host = %config.host, port = config.port, "loaded configuration");

    let options = config.validator_options();
    let resolver = DnsResolver::from_system_conf(options.dns_timeout).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "no usable system resolver configuration, using defaults");
        DnsResolver::new(options.dns_timeout)
    });

    let mut validator = EmailValidator::new(Arc::new(resolver), options);
    if let Some(redis_url) = &config.redis_url {
        match RecordsCache::new(redis_url, config.dns_cache_ttl_secs) {
            Ok(cache) => {
                tracing::info!(ttl_secs = cache.ttl(), "DNS records cache enabled");
                validator = validator.with_cache(cache);
            }
            Err(e) => tracing::warn!(error = %e, "invalid REDIS_URL, running without cache"),
        }
    }

    let schema = create_schema(validator.clone());
    let openapi = ApiDoc::openapi();

    tracing::info!("starting server on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(validator.clone()))
            .app_data(Data::new(schema.clone()))
            .configure(email_validation_api::routes::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
