/// # Health Status Response
///
/// Service status, the time of the check and the running version.
///
/// ## Example JSON
/// ```json
/// {
///   "status": "UP",
///   "timestamp": "2024-03-10T15:30:45.123456789Z",
///   "version": "0.1.0"
/// }
/// ```
pub mod health;

/// Request and response shapes of the validation endpoints.
pub mod email;

pub use email::{
    BulkEmailsRequest, EmailValidationResponse, ErrorResponse, MxHost, ValidateEmailQuery,
    ValidationOptionsQuery,
};
pub use health::HealthResponse;
