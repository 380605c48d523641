//! Concurrent raw calls with ordered results.

use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;

use crate::error::{OperationResult, RawFailure};
use crate::http::{Method, RequestOptions};
use crate::orchestrator::Orchestrator;

/// One call inside a [`Orchestrator::batch`].
#[derive(Debug, Clone)]
pub struct BatchOperation {
    pub method: Method,
    pub path: String,
    pub options: RequestOptions,
}

impl BatchOperation {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

impl Orchestrator {
    /// Run every operation concurrently through the shared executor.
    ///
    /// Results come back in input order regardless of completion order; the
    /// first failure rejects the batch. Operations still in flight keep
    /// running, retries included, and their outcomes are dropped.
    pub async fn batch<T>(&self, operations: Vec<BatchOperation>) -> OperationResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        tracing::debug!(operations = operations.len(), "Running batch");
        let handles = operations.into_iter().map(|op| {
            let executor = self.executor().clone();
            let classifier = executor.classifier().clone();
            let path = op.path.clone();
            let task = tokio::spawn(async move {
                executor.request::<T>(op.method, &op.path, op.options).await
            });
            async move {
                task.await.map_err(|e| {
                    classifier.format_error(
                        RawFailure::Message(format!("batch task failed: {}", e)),
                        &path,
                    )
                })?
            }
        });
        try_join_all(handles).await
    }
}
