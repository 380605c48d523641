//! Keyed registry of domain modules.
//!
//! Mutated only by `register` and `clear`; lookups never create entries.

use std::sync::Arc;
use dashmap::DashMap;

use crate::modules::ApiModule;

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: DashMap<String, Arc<ApiModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, building it with `factory` only if absent.
    ///
    /// Registering an existing name returns the instance already held. The
    /// factory runs without any map lock held, so it may use the registry;
    /// if two callers race, the first insert wins and the other build is
    /// discarded.
    pub fn register<F>(&self, name: &str, factory: F) -> Arc<ApiModule>
    where
        F: FnOnce() -> ApiModule,
    {
        if let Some(existing) = self.get(name) {
            return existing;
        }

        let built = Arc::new(factory());
        self.modules
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(module = %name, "Registering module");
                built
            })
            .value()
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<ApiModule>> {
        self.modules.get(name).map(|r| r.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// All modules, ordered by name.
    pub fn all(&self) -> Vec<(String, Arc<ApiModule>)> {
        let mut modules: Vec<_> = self
            .modules
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        modules.sort_by(|a, b| a.0.cmp(&b.0));
        modules
    }

    pub fn names(&self) -> Vec<String> {
        self.all().into_iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn clear(&self) {
        self.modules.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::http::RequestExecutor;
    use crate::modules::{ModuleDescriptor, ModuleVersion};

    fn executor() -> Arc<RequestExecutor> {
        Arc::new(RequestExecutor::from_config(&GatewayConfig::default()).unwrap())
    }

    fn build(name: &str, executor: &Arc<RequestExecutor>) -> ApiModule {
        ApiModule::new(
            ModuleDescriptor::new(name, ModuleVersion::V2, name),
            executor.clone(),
        )
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = ModuleRegistry::new();
        let exec = executor();

        let first = registry.register("properties", || build("properties", &exec));
        let second = registry.register("properties", || panic!("factory must not run twice"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_and_clear() {
        let registry = ModuleRegistry::new();
        let exec = executor();
        registry.register("rates", || build("rates", &exec));
        registry.register("bookings", || build("bookings", &exec));

        assert!(registry.contains("rates"));
        assert!(registry.get("missing").is_none());
        assert!(!registry.contains("missing"));
        assert_eq!(registry.names(), vec!["bookings", "rates"]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get("rates").is_none());
    }

    #[test]
    fn test_factory_may_use_registry() {
        let registry = ModuleRegistry::new();
        let exec = executor();
        registry.register("rates", || build("rates", &exec));

        let channels = registry.register("channels", || {
            assert!(!registry.contains("channels"));
            assert!(registry.get("rates").is_some());
            registry.register("availability", || build("availability", &exec));
            build("channels", &exec)
        });

        assert_eq!(channels.name(), "channels");
        assert_eq!(registry.names(), vec!["availability", "channels", "rates"]);
    }

    #[test]
    fn test_modules_share_one_executor() {
        let registry = ModuleRegistry::new();
        let exec = executor();
        let a = registry.register("a", || build("a", &exec));
        let b = registry.register("b", || build("b", &exec));
        assert!(Arc::ptr_eq(a.executor(), b.executor()));
    }
}
