//! Scripted in-memory driver shared by unit and integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_locator::{AutomationDriver, DriverError, ElementHandle, LocatorStrategy};
use async_trait::async_trait;

/// Element that records every click and keystroke it receives, including the
/// ones that end in a scripted fault.
#[derive(Debug)]
pub struct FakeElement {
    pub id: String,
    pub text: String,
    pub click_fault: Option<DriverError>,
    pub keys_fault: Option<DriverError>,
    pub action_delay: Option<Duration>,
    pub clicks: AtomicUsize,
    pub typed: Mutex<Vec<String>>,
}

impl FakeElement {
    fn build(id: &str) -> Self {
        Self {
            id: id.to_string(),
            text: format!("text of {id}"),
            click_fault: None,
            keys_fault: None,
            action_delay: None,
            clicks: AtomicUsize::new(0),
            typed: Mutex::new(Vec::new()),
        }
    }

    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self::build(id))
    }

    /// Click registers, then fails with `fault`.
    pub fn failing_click(id: &str, fault: DriverError) -> Arc<Self> {
        Arc::new(Self {
            click_fault: Some(fault),
            ..Self::build(id)
        })
    }

    /// Keys are typed, then the call fails with `fault`.
    pub fn failing_keys(id: &str, fault: DriverError) -> Arc<Self> {
        Arc::new(Self {
            keys_fault: Some(fault),
            ..Self::build(id)
        })
    }

    /// Every action takes `delay` before it completes.
    pub fn slow(id: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            action_delay: Some(delay),
            ..Self::build(id)
        })
    }

    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn typed(&self) -> Vec<String> {
        self.typed.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.action_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn click(&self) -> Result<(), DriverError> {
        self.pause().await;
        self.clicks.fetch_add(1, Ordering::SeqCst);
        match &self.click_fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        self.pause().await;
        self.typed.lock().unwrap().push(text.to_string());
        match &self.keys_fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    async fn text(&self) -> Result<String, DriverError> {
        self.pause().await;
        Ok(self.text.clone())
    }
}

#[derive(Clone)]
enum Behavior {
    Found(Arc<FakeElement>),
    Stale,
    Hang(Duration),
}

/// Unknown strategies fail with `NoSuchElement`.
#[derive(Default)]
pub struct FakeDriver {
    behaviors: Mutex<HashMap<LocatorStrategy, Behavior>>,
    calls: Mutex<Vec<LocatorStrategy>>,
}

impl FakeDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(self: Arc<Self>, strategy: LocatorStrategy, element: Arc<FakeElement>) -> Arc<Self> {
        self.set(strategy, Behavior::Found(element));
        self
    }

    pub fn with_stale(self: Arc<Self>, strategy: LocatorStrategy) -> Arc<Self> {
        self.set(strategy, Behavior::Stale);
        self
    }

    pub fn with_hang(self: Arc<Self>, strategy: LocatorStrategy, delay: Duration) -> Arc<Self> {
        self.set(strategy, Behavior::Hang(delay));
        self
    }

    pub fn calls(&self) -> Vec<LocatorStrategy> {
        self.calls.lock().unwrap().clone()
    }

    fn set(&self, strategy: LocatorStrategy, behavior: Behavior) {
        self.behaviors.lock().unwrap().insert(strategy, behavior);
    }
}

#[async_trait]
impl AutomationDriver for FakeDriver {
    async fn find_element(
        &self,
        strategy: &LocatorStrategy,
    ) -> Result<Arc<dyn ElementHandle>, DriverError> {
        self.calls.lock().unwrap().push(strategy.clone());
        let behavior = self.behaviors.lock().unwrap().get(strategy).cloned();
        match behavior {
            Some(Behavior::Found(element)) => Ok(element),
            Some(Behavior::Stale) => Err(DriverError::StaleElement(strategy.to_string())),
            Some(Behavior::Hang(delay)) => {
                tokio::time::sleep(delay).await;
                Err(DriverError::Other(format!("{strategy} hung")))
            }
            None => Err(DriverError::NoSuchElement(strategy.to_string())),
        }
    }
}
