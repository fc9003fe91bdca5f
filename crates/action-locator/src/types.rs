//! Core types for locator system

use std::fmt;
use std::sync::Arc;

use locator_core_types::LocatorStrategy;

use crate::errors::AttemptFault;
use crate::ports::ElementHandle;

/// Where a planned strategy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptOrigin {
    /// Last-known-good strategy from the store
    Cache,
    /// Supplied by the caller
    Candidate,
    /// Produced by the alternative generator
    Generated,
}

impl AttemptOrigin {
    pub fn name(&self) -> &'static str {
        match self {
            AttemptOrigin::Cache => "cache",
            AttemptOrigin::Candidate => "candidate",
            AttemptOrigin::Generated => "generated",
        }
    }
}

impl fmt::Display for AttemptOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of an ordered resolution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAttempt {
    pub strategy: LocatorStrategy,
    pub origin: AttemptOrigin,
}

impl PlannedAttempt {
    pub fn new(strategy: LocatorStrategy, origin: AttemptOrigin) -> Self {
        Self { strategy, origin }
    }

    pub fn candidate(strategy: LocatorStrategy) -> Self {
        Self::new(strategy, AttemptOrigin::Candidate)
    }
}

/// A strategy that did not yield an element, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub strategy: LocatorStrategy,
    pub origin: AttemptOrigin,
    pub fault: AttemptFault,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.origin, self.strategy, self.fault)
    }
}

/// Work performed on the element as part of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementAction {
    Locate,
    Click,
    SendKeys(String),
    ReadText,
}

impl ElementAction {
    pub fn name(&self) -> &'static str {
        match self {
            ElementAction::Locate => "locate",
            ElementAction::Click => "click",
            ElementAction::SendKeys(_) => "send-keys",
            ElementAction::ReadText => "read-text",
        }
    }
}

/// Value produced by an [`ElementAction`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionOutput {
    #[default]
    None,
    Text(String),
}

impl ActionOutput {
    pub fn into_text(self) -> Option<String> {
        match self {
            ActionOutput::Text(text) => Some(text),
            ActionOutput::None => None,
        }
    }
}

/// First successful attempt of a strategy pass.
#[derive(Debug, Clone)]
pub struct Located {
    pub element: Arc<dyn ElementHandle>,
    pub strategy: LocatorStrategy,
    pub origin: AttemptOrigin,
    pub output: ActionOutput,
    /// Attempts that failed before the winning one
    pub failed: Vec<FailedAttempt>,
}

/// Every planned strategy failed.
#[derive(Debug, Clone, Default)]
pub struct NotFound {
    pub attempts: Vec<FailedAttempt>,
}

/// Per-call state of the self-healing resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvePhase {
    CacheLookup,
    CacheTry,
    Fallback,
    Success,
    Failed,
}

impl ResolvePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolvePhase::Success | ResolvePhase::Failed)
    }
}

/// Element resolution result returned to callers.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub element: Arc<dyn ElementHandle>,

    /// Strategy that located the element
    pub strategy: LocatorStrategy,

    pub origin: AttemptOrigin,

    /// Whether the store was written for this resolution
    pub healed: bool,

    pub(crate) output: ActionOutput,
}

impl Resolution {
    pub fn from_cache(&self) -> bool {
        self.origin == AttemptOrigin::Cache
    }
}
