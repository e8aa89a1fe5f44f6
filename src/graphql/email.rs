use crate::models::{EmailValidationResponse, MxHost};
use crate::validation::{EmailValidator, ErrorKind, MAX_BULK_EMAILS};
use async_graphql::{Context, ErrorExtensions, Object, Result, SimpleObject};

/// A mail exchanger of the address' domain; lower priority is preferred.
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct MxExchange {
    pub priority: i32,
    pub host: String,
}

impl From<MxHost> for MxExchange {
    fn from(mx: MxHost) -> Self {
        Self {
            priority: i32::from(mx.priority),
            host: mx.host,
        }
    }
}

/// Validation verdict for one address, field for field the REST response.
///
/// `error` is one of `MALFORMED_ADDRESS`, `LENGTH_EXCEEDED` or
/// `INVALID_DOMAIN_ENCODING` when the address is invalid.
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct EmailValidation {
    pub is_email_valid: bool,
    pub domain: Option<String>,
    pub original_email: String,
    pub local_part: Option<String>,
    pub ascii_local_part: Option<String>,
    pub ascii_domain: Option<String>,
    pub smtputf8: Option<bool>,
    pub mx: Vec<MxExchange>,
    pub spf: Option<String>,
    pub ascii_email: Option<String>,
    pub error: Option<String>,
}

impl From<EmailValidationResponse> for EmailValidation {
    fn from(response: EmailValidationResponse) -> Self {
        Self {
            is_email_valid: response.is_email_valid,
            domain: response.domain,
            original_email: response.original_email,
            local_part: response.local_part,
            ascii_local_part: response.ascii_local_part,
            ascii_domain: response.ascii_domain,
            smtputf8: response.smtputf8,
            mx: response.mx.into_iter().map(MxExchange::from).collect(),
            spf: response.spf,
            ascii_email: response.ascii_email,
            error: response.error,
        }
    }
}

/// Email validation query operations. The validator comes from schema data.
#[derive(Default)]
pub struct EmailQuery;

#[Object]
impl EmailQuery {
    /// Validates one address.
    async fn validate_email(
        &self,
        ctx: &Context<'_>,
        email: String,
        #[graphql(default = true)] check_deliverability: bool,
    ) -> Result<EmailValidation> {
        let validator = ctx.data::<EmailValidator>()?;
        let result = validator.validate(&email, check_deliverability).await;
        Ok(EmailValidationResponse::from(result).into())
    }

    /// Validates up to 10 addresses; results follow the input order.
    async fn bulk_validate_emails(
        &self,
        ctx: &Context<'_>,
        emails: Vec<String>,
        #[graphql(default = true)] check_deliverability: bool,
    ) -> Result<Vec<EmailValidation>> {
        let validator = ctx.data::<EmailValidator>()?;
        let results = validator
            .validate_many(&emails, MAX_BULK_EMAILS, check_deliverability)
            .await
            .map_err(batch_error)?;

        Ok(results
            .into_iter()
            .map(|result| EmailValidationResponse::from(result).into())
            .collect())
    }
}

fn batch_error(kind: ErrorKind) -> async_graphql::Error {
    async_graphql::Error::new(format!("Max {MAX_BULK_EMAILS} emails can be validated."))
        .extend_with(|_, e| e.set("code", kind.code()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::dnsmx::MockDnsLookup;
    use crate::validation::{MxRecord, ValidatorOptions};
    use async_graphql::{EmptyMutation, EmptySubscription, Schema};
    use std::sync::Arc;

    fn schema_with(mock: MockDnsLookup) -> Schema<EmailQuery, EmptyMutation, EmptySubscription> {
        let validator = EmailValidator::new(Arc::new(mock), ValidatorOptions::default());
        Schema::build(EmailQuery, EmptyMutation, EmptySubscription)
            .data(validator)
            .finish()
    }

    fn offline_schema() -> Schema<EmailQuery, EmptyMutation, EmptySubscription> {
        let mut mock = MockDnsLookup::new();
        mock.expect_lookup_mx().never();
        mock.expect_lookup_address().never();
        mock.expect_lookup_txt().never();
        schema_with(mock)
    }

    #[tokio::test]
    async fn test_validate_email_valid() {
        let query = r#"{
            validateEmail(email: "user@example.com", checkDeliverability: false) {
                isEmailValid domain localPart asciiEmail smtputf8 mx { host } spf error
            }
        }"#;
        let result = offline_schema().execute(query).await;
        assert!(result.errors.is_empty(), "{:?}", result.errors);

        let data = result.data.into_json().unwrap();
        let validation = &data["validateEmail"];
        assert_eq!(validation["isEmailValid"], true);
        assert_eq!(validation["domain"], "example.com");
        assert_eq!(validation["localPart"], "user");
        assert_eq!(validation["asciiEmail"], "user@example.com");
        assert_eq!(validation["smtputf8"], false);
        assert_eq!(validation["mx"], serde_json::json!([]));
        assert!(validation["spf"].is_null());
        assert!(validation["error"].is_null());
    }

    #[tokio::test]
    async fn test_validate_email_invalid() {
        let query = r#"{
            validateEmail(email: "not-an-email", checkDeliverability: false) {
                isEmailValid originalEmail domain error
            }
        }"#;
        let result = offline_schema().execute(query).await;
        assert!(result.errors.is_empty());

        let data = result.data.into_json().unwrap();
        assert_eq!(data["validateEmail"]["isEmailValid"], false);
        assert_eq!(data["validateEmail"]["originalEmail"], "not-an-email");
        assert!(data["validateEmail"]["domain"].is_null());
        assert_eq!(data["validateEmail"]["error"], "MALFORMED_ADDRESS");
    }

    #[tokio::test]
    async fn test_validate_email_checks_deliverability_by_default() {
        let mut mock = MockDnsLookup::new();
        mock.expect_lookup_mx()
            .times(1)
            .returning(|_| Ok(vec![MxRecord::new(5, "mx.example.com")]));
        mock.expect_lookup_address().never();
        mock.expect_lookup_txt()
            .times(1)
            .returning(|_| Ok(vec!["v=spf1 include:_spf.example.com ~all".to_string()]));

        let query = r#"{ validateEmail(email: "user@example.com") { mx { priority host } spf } }"#;
        let result = schema_with(mock).execute(query).await;
        assert!(result.errors.is_empty(), "{:?}", result.errors);

        let data = result.data.into_json().unwrap();
        assert_eq!(data["validateEmail"]["mx"][0]["priority"], 5);
        assert_eq!(data["validateEmail"]["mx"][0]["host"], "mx.example.com");
        assert_eq!(
            data["validateEmail"]["spf"],
            "v=spf1 include:_spf.example.com ~all"
        );
    }

    #[tokio::test]
    async fn test_bulk_validate_emails_preserves_order() {
        let query = r#"{
            bulkValidateEmails(emails: ["a@b.com", "bad"], checkDeliverability: false) {
                originalEmail isEmailValid
            }
        }"#;
        let result = offline_schema().execute(query).await;
        assert!(result.errors.is_empty());

        let data = result.data.into_json().unwrap();
        let results = data["bulkValidateEmails"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["originalEmail"], "a@b.com");
        assert_eq!(results[0]["isEmailValid"], true);
        assert_eq!(results[1]["originalEmail"], "bad");
        assert_eq!(results[1]["isEmailValid"], false);
    }

    #[tokio::test]
    async fn test_bulk_validate_emails_rejects_oversized_batch() {
        let emails: Vec<String> = (0..11).map(|i| format!("\"user{i}@example.com\"")).collect();
        let query = format!(
            "{{ bulkValidateEmails(emails: [{}]) {{ isEmailValid }} }}",
            emails.join(", ")
        );
        let result = offline_schema().execute(query).await;

        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.message, "Max 10 emails can be validated.");
        let extensions = serde_json::to_value(&error.extensions).unwrap();
        assert_eq!(extensions["code"], "BATCH_TOO_LARGE");
    }

    #[test]
    fn test_mx_exchange_from_host() {
        let mx = MxExchange::from(MxHost {
            priority: 10,
            host: "mx.example.com".to_string(),
        });
        assert_eq!(mx.priority, 10);
        assert_eq!(mx.host, "mx.example.com");
    }
}
