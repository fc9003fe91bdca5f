//! Self-healing resolution backed by the persisted locator store

use std::sync::Arc;

use async_trait::async_trait;
use locator_core_types::{ElementName, LocatorStrategy};
use locator_store::LocatorStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::alternatives::AlternativeGenerator;
use crate::errors::HealError;
use crate::policy::HealPolicy;
use crate::ports::AutomationDriver;
use crate::resolver::{ResolveBudget, StrategyResolver};
use crate::types::*;

/// Element-level operations with cache-first, self-healing resolution.
#[async_trait]
pub trait SelfHealer: Send + Sync {
    /// Locate the element, healing the store if a new strategy wins
    async fn resolve(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
    ) -> Result<Resolution, HealError>;

    async fn click(&self, name: &ElementName, candidates: &[LocatorStrategy])
        -> Result<(), HealError>;

    async fn send_keys(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
        text: &str,
    ) -> Result<(), HealError>;

    async fn get_text(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
    ) -> Result<String, HealError>;

    /// `false` when every strategy fails. Never errors.
    async fn exists(&self, name: &ElementName, candidates: &[LocatorStrategy]) -> bool;
}

/// Default self-healing resolver.
///
/// The store is injected and may be shared by resolvers of other sessions;
/// each resolver drives a single automation session and performs one lookup
/// at a time.
pub struct SelfHealingResolver {
    store: Arc<LocatorStore>,
    resolver: StrategyResolver,
    generator: AlternativeGenerator,
    policy: HealPolicy,
    cancel: CancellationToken,
}

impl SelfHealingResolver {
    pub fn new(
        driver: Arc<dyn AutomationDriver>,
        store: Arc<LocatorStore>,
        policy: HealPolicy,
    ) -> Self {
        let resolver = StrategyResolver::new(driver, policy.attempt_timeout())
            .with_precheck(policy.precheck_generated);
        Self {
            store,
            resolver,
            generator: AlternativeGenerator::new(),
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort in-flight and pending attempts when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn store(&self) -> &Arc<LocatorStore> {
        &self.store
    }

    pub fn policy(&self) -> &HealPolicy {
        &self.policy
    }

    /// Ordered attempts for one resolution: the cached strategy first, then
    /// each candidate followed by its generated alternatives. Every strategy
    /// appears once.
    pub fn plan(
        &self,
        cached: Option<&LocatorStrategy>,
        candidates: &[LocatorStrategy],
    ) -> Vec<PlannedAttempt> {
        let mut plan: Vec<PlannedAttempt> = Vec::new();
        if let Some(strategy) = cached {
            plan.push(PlannedAttempt::new(strategy.clone(), AttemptOrigin::Cache));
        }
        for candidate in candidates {
            let expanded = if self.policy.expand_alternatives {
                self.generator.generate(candidate)
            } else {
                vec![candidate.clone()]
            };
            for (idx, strategy) in expanded.into_iter().enumerate() {
                let origin = if idx == 0 {
                    AttemptOrigin::Candidate
                } else {
                    AttemptOrigin::Generated
                };
                match plan.iter_mut().find(|p| p.strategy == strategy) {
                    // caller-supplied strategies are never pre-checked
                    Some(existing) => {
                        if origin == AttemptOrigin::Candidate
                            && existing.origin == AttemptOrigin::Generated
                        {
                            existing.origin = AttemptOrigin::Candidate;
                        }
                    }
                    None => plan.push(PlannedAttempt::new(strategy, origin)),
                }
            }
        }
        plan
    }

    async fn run(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
        action: ElementAction,
    ) -> Result<Resolution, HealError> {
        let mut phase = ResolvePhase::CacheLookup;
        let cached = self.store.get(name);
        phase = advance(name, phase, cached.is_some());

        let plan = self.plan(cached.as_ref(), candidates);
        let budget = ResolveBudget::within(self.policy.resolve_deadline(), self.cancel.clone());

        match self.resolver.locate_and_apply(&plan, &action, &budget).await {
            Ok(located) => {
                if phase == ResolvePhase::CacheTry && located.origin != AttemptOrigin::Cache {
                    phase = advance(name, phase, false);
                }
                let healed = cached.as_ref() != Some(&located.strategy);
                if healed {
                    if let Some(stale) = &cached {
                        info!(
                            element = %name,
                            stale = %stale,
                            healed = %located.strategy,
                            "cached locator stale; healing store"
                        );
                    }
                    self.store.put(name, &located.strategy);
                }
                advance(name, phase, true);
                Ok(Resolution {
                    element: located.element,
                    strategy: located.strategy,
                    origin: located.origin,
                    healed,
                    output: located.output,
                })
            }
            Err(not_found) => {
                if phase == ResolvePhase::CacheTry {
                    phase = advance(name, phase, false);
                }
                advance(name, phase, false);
                warn!(
                    element = %name,
                    action = action.name(),
                    attempts = not_found.attempts.len(),
                    "element not found with any locator"
                );
                Err(HealError::element_not_found(name.clone(), not_found.attempts))
            }
        }
    }
}

/// One transition of the per-call state machine. `ok` is "cache entry
/// present" in `CacheLookup` and "attempt succeeded" everywhere else.
fn advance(name: &ElementName, phase: ResolvePhase, ok: bool) -> ResolvePhase {
    let next = match (phase, ok) {
        (ResolvePhase::CacheLookup, true) => ResolvePhase::CacheTry,
        (ResolvePhase::CacheLookup, false) => ResolvePhase::Fallback,
        (ResolvePhase::CacheTry, true) | (ResolvePhase::Fallback, true) => ResolvePhase::Success,
        (ResolvePhase::CacheTry, false) => ResolvePhase::Fallback,
        (ResolvePhase::Fallback, false) => ResolvePhase::Failed,
        (terminal, _) => terminal,
    };
    debug!(element = %name, from = ?phase, to = ?next, "resolve phase");
    next
}

#[async_trait]
impl SelfHealer for SelfHealingResolver {
    async fn resolve(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
    ) -> Result<Resolution, HealError> {
        self.run(name, candidates, ElementAction::Locate).await
    }

    async fn click(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
    ) -> Result<(), HealError> {
        self.run(name, candidates, ElementAction::Click).await?;
        Ok(())
    }

    async fn send_keys(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
        text: &str,
    ) -> Result<(), HealError> {
        self.run(name, candidates, ElementAction::SendKeys(text.to_string()))
            .await?;
        Ok(())
    }

    async fn get_text(
        &self,
        name: &ElementName,
        candidates: &[LocatorStrategy],
    ) -> Result<String, HealError> {
        let resolution = self.run(name, candidates, ElementAction::ReadText).await?;
        Ok(resolution.output.into_text().unwrap_or_default())
    }

    async fn exists(&self, name: &ElementName, candidates: &[LocatorStrategy]) -> bool {
        match self.run(name, candidates, ElementAction::Locate).await {
            Ok(_) => true,
            Err(err) => {
                debug!(element = %name, %err, "element absent");
                false
            }
        }
    }
}
