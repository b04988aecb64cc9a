use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::store::Store;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const SLOW_RESPONSE_THRESHOLD_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Outcome of a single store ping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    pub message: Option<String>,
    pub response_time_ms: Option<u64>,
    pub version: String,
    pub last_checked: DateTime<Utc>,
}

impl ComponentHealth {
    fn new(status: ComponentStatus, message: Option<&str>, response_time_ms: Option<u64>) -> Self {
        Self {
            status,
            message: message.map(str::to_string),
            response_time_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
            last_checked: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ComponentStatus::Healthy
    }
}

pub struct HealthChecker {
    store: Arc<dyn Store>,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "Check database health", skip(self))]
    pub async fn check(&self) -> ComponentHealth {
        let start = Instant::now();

        match timeout(CHECK_TIMEOUT, self.store.ping()).await {
            Ok(Ok(())) => {
                let elapsed = start.elapsed().as_millis() as u64;
                if elapsed > SLOW_RESPONSE_THRESHOLD_MS {
                    return ComponentHealth::new(
                        ComponentStatus::Degraded,
                        Some("Database responding slowly"),
                        Some(elapsed),
                    );
                }
                ComponentHealth::new(ComponentStatus::Healthy, None, Some(elapsed))
            }
            Ok(Err(e)) => {
                tracing::error!("Database health check failed: {}", e.summary());
                ComponentHealth::new(ComponentStatus::Unhealthy, Some("Database unreachable"), None)
            }
            Err(_) => {
                tracing::error!("Database health check timed out");
                ComponentHealth::new(ComponentStatus::Unhealthy, Some("Timeout"), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_check_healthy() {
        let checker = HealthChecker::new(Arc::new(MemoryStore::new()));
        let health = checker.check().await;
        assert!(health.is_healthy());
        assert!(health.response_time_ms.is_some());
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_check_unhealthy() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let checker = HealthChecker::new(store);
        let health = checker.check().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert!(!health.is_healthy());
        assert_eq!(health.message.as_deref(), Some("Database unreachable"));
    }
}
