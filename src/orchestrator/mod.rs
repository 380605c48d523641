//! Cross-module orchestration.
//!
//! # Operations
//! - `execute_across_modules`: concurrent fan-out, first failure wins
//! - `batch` (batch.rs): concurrent raw calls, results in input order
//! - `transaction` (transaction.rs): sequential steps, reverse compensation
//! - `health_check` (health.rs): parallel probes, AND of results
//!
//! # Design Decisions
//! - One executor, so one admission budget, for every managed module
//! - Fan-out and batch siblings are not cancelled when one fails; their
//!   outcomes are discarded and any side effects they had are not compensated
//! - Compensation is best effort, not two-phase commit

pub mod batch;
pub mod health;
pub mod transaction;

pub use batch::BatchOperation;
pub use health::{HealthReport, ModuleHealth};
pub use transaction::TransactionStep;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use futures_util::future::try_join_all;

use crate::config::GatewayConfig;
use crate::error::{OperationError, OperationResult, RawFailure};
use crate::http::{RequestExecutor, TransportError};
use crate::modules::catalog::standard_modules;
use crate::modules::{ApiModule, ModuleDescriptor, ModuleRegistry};

/// Owns the shared executor and the modules bound to it.
#[derive(Debug)]
pub struct Orchestrator {
    executor: Arc<RequestExecutor>,
    registry: ModuleRegistry,
}

impl Orchestrator {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self {
            executor,
            registry: ModuleRegistry::new(),
        }
    }

    /// Build the production executor and register every standard module.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, TransportError> {
        let executor = Arc::new(RequestExecutor::from_config(config)?);
        Ok(Self::with_standard_modules(executor))
    }

    pub fn with_standard_modules(executor: Arc<RequestExecutor>) -> Self {
        let orchestrator = Self::new(executor);
        for descriptor in standard_modules() {
            orchestrator.register_descriptor(descriptor);
        }
        orchestrator
    }

    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    /// Register `name`, building it from the shared executor if absent.
    pub fn register_module<F>(&self, name: &str, factory: F) -> Arc<ApiModule>
    where
        F: FnOnce(Arc<RequestExecutor>) -> ApiModule,
    {
        let executor = self.executor.clone();
        self.registry.register(name, move || factory(executor))
    }

    pub fn register_descriptor(&self, descriptor: ModuleDescriptor) -> Arc<ApiModule> {
        let name = descriptor.name.clone();
        self.register_module(&name, move |executor| ApiModule::new(descriptor, executor))
    }

    pub fn get_module(&self, name: &str) -> Option<Arc<ApiModule>> {
        self.registry.get(name)
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn get_all_modules(&self) -> Vec<(String, Arc<ApiModule>)> {
        self.registry.all()
    }

    pub fn clear_modules(&self) {
        self.registry.clear();
    }

    /// Run `operation` concurrently on the selected (default: all) modules.
    ///
    /// The first failure rejects the whole call. Sibling tasks keep running
    /// to completion in the background; their outcomes are dropped.
    pub async fn execute_across_modules<T, F, Fut>(
        &self,
        operation: F,
        module_names: Option<&[&str]>,
    ) -> OperationResult<HashMap<String, T>>
    where
        F: Fn(Arc<ApiModule>) -> Fut,
        Fut: Future<Output = OperationResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let selected = match module_names {
            Some(names) => {
                let mut selected = Vec::with_capacity(names.len());
                for name in names {
                    match self.registry.get(name) {
                        Some(module) => selected.push((name.to_string(), module)),
                        None => {
                            return Err(self.executor.classifier().create_validation_error(
                                name,
                                format!("Module '{}' is not registered", name),
                                None,
                            ))
                        }
                    }
                }
                selected
            }
            None => self.registry.all(),
        };

        let handles = selected.into_iter().map(|(name, module)| {
            let task = tokio::spawn(operation(module));
            let classifier = self.executor.classifier().clone();
            async move {
                let value = task.await.map_err(|e| {
                    classifier.format_error(
                        RawFailure::Message(format!("module task failed: {}", e)),
                        &name,
                    )
                })??;
                Ok::<_, OperationError>((name, value))
            }
        });

        let results = try_join_all(handles).await?;
        Ok(results.into_iter().collect())
    }
}
