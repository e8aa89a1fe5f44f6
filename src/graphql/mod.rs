//! GraphQL mirror of the REST API: `health`, `validateEmail` and
//! `bulkValidateEmails`.

pub mod email;
pub mod handlers;
pub mod health;
pub mod schema;
