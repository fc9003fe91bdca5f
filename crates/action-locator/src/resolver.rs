//! Single-pass strategy resolution against an automation driver

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use locator_core_types::LocatorStrategy;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{AttemptFault, DriverError};
use crate::ports::{AutomationDriver, ElementHandle};
use crate::precheck::check_expression;
use crate::types::*;

/// Aggregate limits for one resolution pass.
#[derive(Debug, Clone, Default)]
pub struct ResolveBudget {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl ResolveBudget {
    /// No deadline and a token nobody cancels.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant, cancel: CancellationToken) -> Self {
        Self {
            deadline: Some(deadline),
            cancel,
        }
    }

    /// Deadline `within` from now.
    pub fn within(within: Duration, cancel: CancellationToken) -> Self {
        Self::with_deadline(Instant::now() + within, cancel)
    }

    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

/// Tries strategies in order and returns the first that resolves.
///
/// There is no delay or retry between attempts; waiting for the page is the
/// caller's concern.
pub struct StrategyResolver {
    driver: Arc<dyn AutomationDriver>,
    attempt_timeout: Duration,
    precheck_generated: bool,
}

impl StrategyResolver {
    pub fn new(driver: Arc<dyn AutomationDriver>, attempt_timeout: Duration) -> Self {
        Self {
            driver,
            attempt_timeout,
            precheck_generated: true,
        }
    }

    pub fn with_precheck(mut self, enabled: bool) -> Self {
        self.precheck_generated = enabled;
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Locate with caller-supplied strategies and no aggregate deadline.
    pub async fn locate(&self, strategies: &[LocatorStrategy]) -> Result<Located, NotFound> {
        let plan: Vec<_> = strategies
            .iter()
            .cloned()
            .map(PlannedAttempt::candidate)
            .collect();
        self.locate_and_apply(&plan, &ElementAction::Locate, &ResolveBudget::unbounded())
            .await
    }

    /// Run `action` on the first strategy whose lookup and action both
    /// succeed. Lookup faults, and action faults saying the element is gone
    /// or stale, fall through to the next planned strategy. Any other action
    /// fault or timeout ends the pass; the remaining strategies are reported
    /// as abandoned.
    pub async fn locate_and_apply(
        &self,
        plan: &[PlannedAttempt],
        action: &ElementAction,
        budget: &ResolveBudget,
    ) -> Result<Located, NotFound> {
        let mut failed = Vec::with_capacity(plan.len());
        let mut halted: Option<AttemptFault> = None;

        for planned in plan {
            if let Some(fault) = &halted {
                failed.push(failure(planned, fault.clone()));
                continue;
            }
            if budget.cancel.is_cancelled() {
                halted = Some(AttemptFault::Cancelled);
                failed.push(failure(planned, AttemptFault::Cancelled));
                continue;
            }

            let mut limit = self.attempt_timeout;
            if let Some(remaining) = budget.remaining() {
                if remaining.is_zero() {
                    debug!(strategy = %planned.strategy, "resolution deadline reached");
                    halted = Some(AttemptFault::DeadlineExceeded);
                    failed.push(failure(planned, AttemptFault::DeadlineExceeded));
                    continue;
                }
                limit = limit.min(remaining);
            }

            if self.precheck_generated && planned.origin == AttemptOrigin::Generated {
                if let Err(reason) = check_expression(&planned.strategy) {
                    debug!(strategy = %planned.strategy, %reason, "generated locator rejected");
                    failed.push(failure(planned, AttemptFault::Rejected(reason)));
                    continue;
                }
            }

            debug!(
                strategy = %planned.strategy,
                origin = %planned.origin,
                action = action.name(),
                "trying locator"
            );
            let started = Instant::now();
            let lookup = bounded(
                limit,
                &budget.cancel,
                self.driver.find_element(&planned.strategy),
            )
            .await;
            let element = match lookup {
                Ok(element) => element,
                Err(fault) => {
                    debug!(strategy = %planned.strategy, %fault, "locator attempt failed");
                    if fault == AttemptFault::Cancelled {
                        halted = Some(AttemptFault::Cancelled);
                    }
                    failed.push(failure(planned, fault));
                    continue;
                }
            };

            let left = limit.saturating_sub(started.elapsed());
            let applied = bounded(left, &budget.cancel, apply(element.as_ref(), action)).await;
            match applied {
                Ok(output) => {
                    debug!(strategy = %planned.strategy, "locator resolved");
                    return Ok(Located {
                        element,
                        strategy: planned.strategy.clone(),
                        origin: planned.origin,
                        output,
                        failed,
                    });
                }
                Err(AttemptFault::Driver(err)) if err.is_element_gone() => {
                    debug!(strategy = %planned.strategy, %err, "element went away before action");
                    failed.push(failure(planned, AttemptFault::Driver(err)));
                }
                Err(fault) => {
                    // the action may have partly run; never repeat it on another strategy
                    let fault = match fault {
                        AttemptFault::Driver(err) => AttemptFault::Action(err),
                        other => other,
                    };
                    debug!(
                        strategy = %planned.strategy,
                        action = action.name(),
                        %fault,
                        "element action failed"
                    );
                    halted = Some(match fault {
                        AttemptFault::Cancelled => AttemptFault::Cancelled,
                        _ => AttemptFault::Abandoned,
                    });
                    failed.push(failure(planned, fault));
                }
            }
        }

        debug!(attempts = failed.len(), "all locator strategies exhausted");
        Err(NotFound { attempts: failed })
    }
}

/// Run `work` under `limit`, giving up early if `cancel` fires.
async fn bounded<T, F>(
    limit: Duration,
    cancel: &CancellationToken,
    work: F,
) -> Result<T, AttemptFault>
where
    F: Future<Output = Result<T, DriverError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(AttemptFault::Cancelled),
        result = tokio::time::timeout(limit, work) => match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(AttemptFault::Driver(err)),
            Err(_) => Err(AttemptFault::Timeout(limit)),
        },
    }
}

async fn apply(
    element: &dyn ElementHandle,
    action: &ElementAction,
) -> Result<ActionOutput, DriverError> {
    match action {
        ElementAction::Locate => Ok(ActionOutput::None),
        ElementAction::Click => {
            element.click().await?;
            Ok(ActionOutput::None)
        }
        ElementAction::SendKeys(text) => {
            element.send_keys(text).await?;
            Ok(ActionOutput::None)
        }
        ElementAction::ReadText => Ok(ActionOutput::Text(element.text().await?)),
    }
}

fn failure(planned: &PlannedAttempt, fault: AttemptFault) -> FailedAttempt {
    FailedAttempt {
        strategy: planned.strategy.clone(),
        origin: planned.origin,
        fault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDriver, FakeElement};

    #[tokio::test]
    async fn returns_first_success_in_input_order() {
        let driver = FakeDriver::new()
            .with(LocatorStrategy::xpath("//button"), FakeElement::new("b1"))
            .with(LocatorStrategy::id("buy"), FakeElement::new("b2"));
        let resolver = StrategyResolver::new(driver.clone(), Duration::from_secs(1));

        let located = resolver
            .locate(&[
                LocatorStrategy::css(".gone"),
                LocatorStrategy::xpath("//button"),
                LocatorStrategy::id("buy"),
            ])
            .await
            .unwrap();

        assert_eq!(located.strategy, LocatorStrategy::xpath("//button"));
        assert_eq!(located.failed.len(), 1);
        assert_eq!(
            driver.calls(),
            vec![LocatorStrategy::css(".gone"), LocatorStrategy::xpath("//button")]
        );
    }

    #[tokio::test]
    async fn not_found_carries_fault_per_strategy() {
        let driver = FakeDriver::new().with_stale(LocatorStrategy::id("cart"));
        let resolver = StrategyResolver::new(driver, Duration::from_secs(1));

        let not_found = resolver
            .locate(&[LocatorStrategy::css(".cart"), LocatorStrategy::id("cart")])
            .await
            .unwrap_err();

        assert_eq!(not_found.attempts.len(), 2);
        assert!(matches!(
            not_found.attempts[0].fault,
            AttemptFault::Driver(DriverError::NoSuchElement(_))
        ));
        assert!(matches!(
            not_found.attempts[1].fault,
            AttemptFault::Driver(DriverError::StaleElement(_))
        ));
    }

    #[tokio::test]
    async fn rejected_generated_locator_is_never_sent() {
        let driver = FakeDriver::new();
        let resolver = StrategyResolver::new(driver.clone(), Duration::from_secs(1));
        let plan = vec![PlannedAttempt::new(
            LocatorStrategy::xpath("//*[@id=\"x]"),
            AttemptOrigin::Generated,
        )];

        let not_found = resolver
            .locate_and_apply(&plan, &ElementAction::Locate, &ResolveBudget::unbounded())
            .await
            .unwrap_err();

        assert!(matches!(
            not_found.attempts[0].fault,
            AttemptFault::Rejected(_)
        ));
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn cancelled_budget_skips_everything() {
        let driver = FakeDriver::new().with(LocatorStrategy::id("q"), FakeElement::new("q"));
        let resolver = StrategyResolver::new(driver.clone(), Duration::from_secs(1));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let budget = ResolveBudget::within(Duration::from_secs(5), cancel);

        let not_found = resolver
            .locate_and_apply(
                &[PlannedAttempt::candidate(LocatorStrategy::id("q"))],
                &ElementAction::Locate,
                &budget,
            )
            .await
            .unwrap_err();

        assert_eq!(not_found.attempts[0].fault, AttemptFault::Cancelled);
        assert!(driver.calls().is_empty());
    }
}
