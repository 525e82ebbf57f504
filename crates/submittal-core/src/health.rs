//! Health reporting for the renderer and document store collaborators.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Represents the operational status of a collaborator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Service is operating normally
    #[default]
    Healthy,
    /// Service answered but not as expected
    Degraded,
    /// Service is not operational
    Unhealthy,
}

/// Health information for a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current service status
    pub status: ServiceStatus,
    /// Response time for the health check
    pub response: Option<Duration>,
    /// Optional message describing the current state
    pub message: Option<String>,
    /// Timestamp when the health check was performed
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    fn with_status(status: ServiceStatus, message: Option<String>) -> Self {
        Self {
            status,
            response: None,
            message,
            checked_at: Timestamp::now(),
        }
    }

    /// Creates a new healthy report.
    pub fn healthy() -> Self {
        Self::with_status(ServiceStatus::Healthy, None)
    }

    /// Creates a new degraded report.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Degraded, Some(message.into()))
    }

    /// Creates a new unhealthy report.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Unhealthy, Some(message.into()))
    }

    /// Sets the response time for this health check.
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response = Some(response_time);
        self
    }

    /// Returns whether the collaborator is fully operational.
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(ServiceHealth::healthy().is_healthy());

        let degraded = ServiceHealth::degraded("status 404");
        assert_eq!(degraded.status, ServiceStatus::Degraded);
        assert_eq!(degraded.message.as_deref(), Some("status 404"));

        let unhealthy = ServiceHealth::unhealthy("refused").with_response_time(Duration::from_millis(3));
        assert!(!unhealthy.is_healthy());
        assert_eq!(unhealthy.response, Some(Duration::from_millis(3)));
    }
}
