use crate::models::health::HealthResponse;
use async_graphql::{Context, Object, Result};

/// GraphQL representation of service health status, mirroring the REST
/// health response.
#[derive(Debug)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

impl From<HealthResponse> for Health {
    fn from(response: HealthResponse) -> Self {
        Self {
            status: response.status,
            timestamp: response.timestamp,
            version: response.version,
        }
    }
}

#[Object]
impl Health {
    /// Current service status, "UP" while the service answers
    async fn status(&self) -> &str {
        &self.status
    }

    /// RFC 3339 timestamp of the check, in UTC
    async fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Version of the running service
    async fn version(&self) -> &str {
        &self.version
    }
}

/// Root query type for health-related GraphQL operations
#[derive(Default)]
pub struct HealthQuery;

#[Object]
impl HealthQuery {
    /// Checks service health status
    async fn health(&self, _ctx: &Context<'_>) -> Result<Health> {
        Ok(Health::from(HealthResponse::up()))
    }
}
