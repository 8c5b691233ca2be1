//! Service lifecycle for stateful components

use crate::Result;
use async_trait::async_trait;
use std::any::Any;

/// Service trait for stateful, long-running components
///
/// Stateless analyzers are plain structs; anything that owns session state
/// or a persistence handle goes through this lifecycle so hosts can bring
/// components up and down in a uniform way.
#[async_trait]
pub trait Service: Send + Sync + Any {
    /// Service type name (unique identifier)
    fn service_type(&self) -> &str;

    /// Initialize the service (acquire resources, warm caches)
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Start the service
    async fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Stop the service (flush and release)
    async fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    /// Check if service is running
    fn is_running(&self) -> bool {
        false
    }

    /// Get service health status
    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::Healthy)
    }

    /// Downcast support
    fn as_any(&self) -> &dyn Any
    where
        Self: Sized,
    {
        self
    }
}

/// Service health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServiceHealth {
    /// Service is healthy and operational
    Healthy,
    /// Service is degraded but functional
    Degraded,
    /// Service is unhealthy/not functional
    Unhealthy,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullService;

    #[async_trait]
    impl Service for NullService {
        fn service_type(&self) -> &str {
            "null-service"
        }
    }

    #[tokio::test]
    async fn test_default_lifecycle() {
        let mut service = NullService;
        assert!(!service.is_running());
        service.initialize().await.unwrap();
        service.start().await.unwrap();
        service.stop().await.unwrap();

        let health = service.health_check().await.unwrap();
        assert_eq!(health, ServiceHealth::Healthy);
    }
}
