//! Sequential steps with compensating actions.
//!
//! The store offers no transaction spanning both collections, so multi-step
//! writes run as a saga: steps execute in order, and when one fails every
//! completed step is compensated in reverse order. Compensation failures are
//! collected rather than aborting the rollback.

use async_trait::async_trait;
use tracing::{error, warn};

use crate::error::TrackerError;

#[async_trait]
pub trait SagaStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self) -> crate::Result<()>;

    /// Undo a successful `execute`. Steps with nothing to undo keep the default.
    async fn compensate(&self) -> crate::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct CompensationError {
    pub step: &'static str,
    pub error: TrackerError,
}

/// Why a saga stopped, and what could not be rolled back.
#[derive(Debug)]
pub struct SagaFailure {
    pub failed_step: &'static str,
    pub error: TrackerError,
    pub compensation_errors: Vec<CompensationError>,
}

impl SagaFailure {
    /// True when every completed step was rolled back.
    pub fn is_fully_compensated(&self) -> bool {
        self.compensation_errors.is_empty()
    }

    pub fn into_error(self) -> TrackerError {
        self.error
    }
}

pub struct Saga<'a> {
    name: &'static str,
    steps: Vec<Box<dyn SagaStep + 'a>>,
}

impl std::fmt::Debug for Saga<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<&str> = self.steps.iter().map(|step| step.name()).collect();
        f.debug_struct("Saga")
            .field("name", &self.name)
            .field("steps", &steps)
            .finish()
    }
}

impl<'a> Saga<'a> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl SagaStep + 'a) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub async fn run(self) -> Result<(), SagaFailure> {
        for (index, step) in self.steps.iter().enumerate() {
            let Err(err) = step.execute().await else {
                continue;
            };

            warn!(
                saga = self.name,
                step = step.name(),
                error = %err,
                "saga step failed; compensating {} completed step(s)",
                index
            );

            let mut compensation_errors = Vec::new();
            for done in self.steps[..index].iter().rev() {
                if let Err(comp_err) = done.compensate().await {
                    error!(
                        saga = self.name,
                        step = done.name(),
                        error = %comp_err,
                        "compensation failed; store left inconsistent"
                    );
                    compensation_errors.push(CompensationError {
                        step: done.name(),
                        error: comp_err,
                    });
                }
            }

            return Err(SagaFailure {
                failed_step: step.name(),
                error: err,
                compensation_errors,
            });
        }
        Ok(())
    }
}
