use super::email::EmailQuery;
use super::health::HealthQuery;
use crate::validation::EmailValidator;
use async_graphql::{EmptyMutation, EmptySubscription, MergedObject, Schema};

/// Root query: health plus the email validation operations.
#[derive(MergedObject, Default)]
pub struct QueryRoot(HealthQuery, EmailQuery);

/// The GraphQL schema. Queries only; mutations and subscriptions are empty.
pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Builds the schema around a shared validator.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use email_validation_api::graphql::schema::create_schema;
/// use email_validation_api::validation::{DnsResolver, EmailValidator, ValidatorOptions};
///
/// let options = ValidatorOptions::default();
/// let resolver = DnsResolver::new(options.dns_timeout);
/// let schema = create_schema(EmailValidator::new(Arc::new(resolver), options));
/// ```
pub fn create_schema(validator: EmailValidator) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        EmptyMutation::default(),
        EmptySubscription::default(),
    )
    .data(validator)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidatorOptions;
    use crate::validation::dnsmx::MockDnsLookup;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_schema_merges_all_queries() {
        let validator = EmailValidator::new(
            Arc::new(MockDnsLookup::new()),
            ValidatorOptions::default(),
        );
        let schema = create_schema(validator);

        let query = r#"{
            health { status }
            validateEmail(email: "user@example.com", checkDeliverability: false) { isEmailValid }
        }"#;
        let result = schema.execute(query).await;
        assert!(result.errors.is_empty(), "{:?}", result.errors);

        let data = result.data.into_json().unwrap();
        assert_eq!(data["health"]["status"], "UP");
        assert_eq!(data["validateEmail"]["isEmailValid"], true);
    }

    #[test]
    fn test_sdl_exposes_operations() {
        let validator = EmailValidator::new(
            Arc::new(MockDnsLookup::new()),
            ValidatorOptions::default(),
        );
        let sdl = create_schema(validator).sdl();

        assert!(sdl.contains("validateEmail"));
        assert!(sdl.contains("bulkValidateEmails"));
        assert!(sdl.contains("checkDeliverability: Boolean! = true"));
    }
}
