use locator_core_types::{LocatorKind, LocatorStrategy};
use serde::{Deserialize, Serialize};

/// On-disk shape of a single cache entry: `{"by": "css", "value": ".buy-btn"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLocator {
    pub by: LocatorKind,
    pub value: String,
}

impl StoredLocator {
    /// Entries with an empty value are treated as absent.
    pub fn into_strategy(self) -> Option<LocatorStrategy> {
        if self.value.is_empty() {
            return None;
        }
        Some(LocatorStrategy::new(self.by, self.value))
    }
}

impl From<&LocatorStrategy> for StoredLocator {
    fn from(strategy: &LocatorStrategy) -> Self {
        Self {
            by: strategy.kind(),
            value: strategy.expression().to_string(),
        }
    }
}
