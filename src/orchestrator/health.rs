//! Aggregate module health.
//!
//! Every registered module is probed in parallel on each call; nothing is
//! cached. Any probe failure marks the module unhealthy, 404 included.

use std::collections::BTreeMap;
use futures_util::future::join_all;
use serde::Serialize;

use crate::observability::metrics;
use crate::orchestrator::Orchestrator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHealth {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub modules: BTreeMap<String, ModuleHealth>,
}

impl Orchestrator {
    /// Probe every module; the report is healthy only if all probes pass.
    pub async fn health_check(&self) -> HealthReport {
        let probes = self.get_all_modules().into_iter().map(|(name, module)| async move {
            let health = match module.probe().await {
                Ok(_) => ModuleHealth {
                    healthy: true,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(module = %name, status = e.status(), error = %e, "Module probe failed");
                    ModuleHealth {
                        healthy: false,
                        error: Some(e.message().to_string()),
                    }
                }
            };
            metrics::record_module_health(&name, health.healthy);
            (name, health)
        });

        let modules: BTreeMap<String, ModuleHealth> = join_all(probes).await.into_iter().collect();
        let healthy = modules.values().all(|m| m.healthy);

        tracing::info!(healthy, modules = modules.len(), "Health check complete");
        HealthReport { healthy, modules }
    }
}
