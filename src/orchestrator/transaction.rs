//! Sequential steps with best-effort compensating rollback.
//!
//! # Rules
//! - Steps run strictly in order; the first failure stops the sequence
//! - Only steps that already succeeded are rolled back, newest first
//! - The failing step's own rollback never runs
//! - Rollback failures are logged and dropped; the step failure is returned

use std::fmt::Display;
use std::future::Future;
use futures_util::future::BoxFuture;

use crate::orchestrator::Orchestrator;

type ExecuteFn<'a, T, E> = Box<dyn FnOnce() -> BoxFuture<'a, Result<T, E>> + Send + 'a>;
type RollbackFn<'a, T, E> = Box<dyn FnOnce(&T) -> BoxFuture<'a, Result<(), E>> + Send + 'a>;

/// One unit of work in [`Orchestrator::transaction`].
pub struct TransactionStep<'a, T, E> {
    name: String,
    execute: ExecuteFn<'a, T, E>,
    rollback: Option<RollbackFn<'a, T, E>>,
}

impl<'a, T, E> TransactionStep<'a, T, E> {
    pub fn new<F, Fut>(name: impl Into<String>, execute: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T, E>> + Send + 'a,
    {
        Self {
            name: name.into(),
            execute: Box::new(move || Box::pin(execute())),
            rollback: None,
        }
    }

    /// Compensation for this step; receives the value the step produced.
    pub fn with_rollback<F, Fut>(mut self, rollback: F) -> Self
    where
        F: FnOnce(&T) -> Fut + Send + 'a,
        Fut: Future<Output = Result<(), E>> + Send + 'a,
    {
        self.rollback = Some(Box::new(move |value: &T| -> BoxFuture<'a, Result<(), E>> {
            Box::pin(rollback(value))
        }));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Orchestrator {
    /// Execute `steps` in order, compensating completed ones on failure.
    pub async fn transaction<'a, T, E>(&self, steps: Vec<TransactionStep<'a, T, E>>) -> Result<Vec<T>, E>
    where
        E: Display,
    {
        let mut completed: Vec<(String, T, Option<RollbackFn<'a, T, E>>)> = Vec::with_capacity(steps.len());

        for step in steps {
            let TransactionStep {
                name,
                execute,
                rollback,
            } = step;

            match execute().await {
                Ok(value) => {
                    tracing::debug!(step = %name, "Transaction step completed");
                    completed.push((name, value, rollback));
                }
                Err(error) => {
                    tracing::warn!(
                        step = %name,
                        error = %error,
                        completed = completed.len(),
                        "Transaction step failed, rolling back"
                    );
                    for (done, value, rollback) in completed.into_iter().rev() {
                        let Some(rollback) = rollback else {
                            continue;
                        };
                        if let Err(rollback_error) = rollback(&value).await {
                            tracing::warn!(
                                step = %done,
                                error = %rollback_error,
                                "Rollback failed, continuing"
                            );
                        }
                    }
                    return Err(error);
                }
            }
        }

        Ok(completed.into_iter().map(|(_, value, _)| value).collect())
    }
}
