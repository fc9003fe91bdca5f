//! Driver-facing ports.
//!
//! The engine never talks to a browser directly; test harnesses plug in an
//! adapter over their WebDriver/CDP client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use locator_core_types::LocatorStrategy;

use crate::errors::DriverError;

/// Handle to a located element.
#[async_trait]
pub trait ElementHandle: Send + Sync + fmt::Debug {
    async fn click(&self) -> Result<(), DriverError>;
    async fn send_keys(&self, text: &str) -> Result<(), DriverError>;
    async fn text(&self) -> Result<String, DriverError>;
}

/// Single-strategy lookup offered by an automation session.
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    async fn find_element(
        &self,
        strategy: &LocatorStrategy,
    ) -> Result<Arc<dyn ElementHandle>, DriverError>;
}
