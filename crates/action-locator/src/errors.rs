//! Error types for the locator system

use std::time::Duration;

use locator_core_types::{ElementName, LocatorStrategy};
use thiserror::Error;

use crate::types::{AttemptOrigin, FailedAttempt};

/// Fault reported by an automation driver for a lookup or element action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// No element matched the strategy
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// Element was found but detached before it could be used
    #[error("stale element: {0}")]
    StaleElement(String),

    /// Driver rejected the expression as malformed
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Any other driver-specific failure
    #[error("driver error: {0}")]
    Other(String),
}

impl DriverError {
    /// The element is missing or detached, so another strategy may still find it.
    pub fn is_element_gone(&self) -> bool {
        matches!(
            self,
            DriverError::NoSuchElement(_) | DriverError::StaleElement(_)
        )
    }
}

/// Why a single strategy attempt did not produce a usable element.
///
/// Attempt faults are internal; lookup faults trigger fallback to the next
/// strategy. All of them are reported to callers inside
/// [`HealError::ElementNotFound`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptFault {
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Attempt exceeded the per-attempt timeout
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// Aggregate deadline passed before this strategy was reached
    #[error("resolution deadline exceeded before attempt")]
    DeadlineExceeded,

    /// Caller cancelled the resolution before this strategy was reached
    #[error("resolution cancelled")]
    Cancelled,

    /// Generated expression failed the syntax pre-check and was not sent
    #[error("rejected by pre-check: {0}")]
    Rejected(String),

    /// Element was located but the action on it failed; the action may have
    /// partly taken effect, so no further strategy is tried
    #[error("element action failed: {0}")]
    Action(DriverError),

    /// Not tried because an earlier action may have already touched the page
    #[error("abandoned after a failed element action")]
    Abandoned,
}

impl AttemptFault {
    /// Whether the driver was actually asked to run this attempt.
    pub fn was_attempted(&self) -> bool {
        matches!(
            self,
            AttemptFault::Driver(_) | AttemptFault::Timeout(_) | AttemptFault::Action(_)
        )
    }
}

/// Errors surfaced to callers of the self-healing resolver.
#[derive(Debug, Error, Clone)]
pub enum HealError {
    /// Cached, candidate and generated strategies were all exhausted, or an
    /// action failed on a located element
    #[error("element '{name}' not found after {} attempts", .attempts.len())]
    ElementNotFound {
        name: ElementName,
        attempts: Vec<FailedAttempt>,
    },
}

impl HealError {
    pub fn element_not_found(name: ElementName, attempts: Vec<FailedAttempt>) -> Self {
        HealError::ElementNotFound { name, attempts }
    }

    pub fn name(&self) -> &ElementName {
        match self {
            HealError::ElementNotFound { name, .. } => name,
        }
    }

    /// Every attempt in the order it was planned.
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            HealError::ElementNotFound { attempts, .. } => attempts,
        }
    }

    /// Strategies that were planned for this resolution, in order.
    pub fn attempted_strategies(&self) -> Vec<&LocatorStrategy> {
        self.attempts().iter().map(|a| &a.strategy).collect()
    }

    /// Whether a retry by the caller could plausibly succeed (the page may
    /// still have been loading).
    pub fn is_retryable(&self) -> bool {
        self.attempts().iter().any(|attempt| {
            matches!(
                attempt.fault,
                AttemptFault::Timeout(_)
                    | AttemptFault::DeadlineExceeded
                    | AttemptFault::Driver(DriverError::StaleElement(_))
            )
        })
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        let cache_failed = self
            .attempts()
            .iter()
            .any(|attempt| attempt.origin == AttemptOrigin::Cache);
        if cache_failed {
            2
        } else {
            1
        }
    }
}
