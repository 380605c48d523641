//! Domain API modules.
//!
//! # Data Flow
//! ```text
//! ModuleDescriptor { name, version, base_path }
//!     → bound to the shared RequestExecutor at registration
//!     → list/get/create/update/delete resolve under base_path
//!     → RequestExecutor::request
//! ```
//!
//! # Design Decisions
//! - Modules are stateless beyond their executor binding
//! - The executor is injected, never looked up globally
//! - A module pinned to one API version always uses it

pub mod catalog;
pub mod registry;

pub use registry::ModuleRegistry;

use std::fmt::Display;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OperationResult;
use crate::http::{ApiVersion, Method, RequestExecutor, RequestOptions};

/// API generation(s) a module is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleVersion {
    V1,
    V2,
    /// Either version; the caller or the executor default decides.
    Both,
}

impl ModuleVersion {
    pub fn pinned(&self) -> Option<ApiVersion> {
        match self {
            ModuleVersion::V1 => Some(ApiVersion::V1),
            ModuleVersion::V2 => Some(ApiVersion::V2),
            ModuleVersion::Both => None,
        }
    }
}

/// Static identity of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub name: String,
    pub version: ModuleVersion,
    pub base_path: String,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, version: ModuleVersion, base_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version,
            base_path: base_path.into().trim_matches('/').to_string(),
        }
    }
}

/// A domain module bound to one executor.
#[derive(Debug, Clone)]
pub struct ApiModule {
    descriptor: ModuleDescriptor,
    executor: Arc<RequestExecutor>,
}

impl ApiModule {
    pub fn new(descriptor: ModuleDescriptor, executor: Arc<RequestExecutor>) -> Self {
        Self {
            descriptor,
            executor,
        }
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn version(&self) -> ModuleVersion {
        self.descriptor.version
    }

    pub fn base_path(&self) -> &str {
        &self.descriptor.base_path
    }

    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    /// Call `sub_path` relative to this module's base path.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        sub_path: &str,
        mut options: RequestOptions,
    ) -> OperationResult<T> {
        if let Some(version) = self.descriptor.version.pinned() {
            options.api_version = Some(version);
        }
        let path = self.resolve(sub_path);
        self.executor.request(method, &path, options).await
    }

    pub async fn list<T: DeserializeOwned>(&self, options: RequestOptions) -> OperationResult<T> {
        self.request(Method::GET, "", options).await
    }

    pub async fn get<T: DeserializeOwned>(&self, id: impl Display) -> OperationResult<T> {
        self.request(Method::GET, &id.to_string(), RequestOptions::new())
            .await
    }

    pub async fn create<T: DeserializeOwned>(&self, body: Value) -> OperationResult<T> {
        self.request(Method::POST, "", RequestOptions::new().body(body))
            .await
    }

    pub async fn update<T: DeserializeOwned>(&self, id: impl Display, body: Value) -> OperationResult<T> {
        self.request(Method::PUT, &id.to_string(), RequestOptions::new().body(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, id: impl Display) -> OperationResult<T> {
        self.request(Method::DELETE, &id.to_string(), RequestOptions::new())
            .await
    }

    /// Lightweight reachability check: one un-retried GET of the base path.
    pub async fn probe(&self) -> OperationResult<Value> {
        self.request(Method::GET, "", RequestOptions::new().skip_retry())
            .await
    }

    fn resolve(&self, sub_path: &str) -> String {
        let sub_path = sub_path.trim_matches('/');
        match (self.descriptor.base_path.is_empty(), sub_path.is_empty()) {
            (_, true) => self.descriptor.base_path.clone(),
            (true, false) => sub_path.to_string(),
            (false, false) => format!("{}/{}", self.descriptor.base_path, sub_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::http::mock::{MockReply, MockTransport};
    use serde_json::json;

    fn module(version: ModuleVersion, transport: &Arc<MockTransport>) -> ApiModule {
        let mut config = GatewayConfig::default();
        config.api.base_url = "http://upstream.test".to_string();
        let executor = Arc::new(RequestExecutor::with_transport(&config, transport.clone()));
        ApiModule::new(ModuleDescriptor::new("bookings", version, "/reservations/bookings/"), executor)
    }

    #[tokio::test]
    async fn test_crud_paths() {
        let transport = Arc::new(MockTransport::always(MockReply::ok(json!({}))));
        let bookings = module(ModuleVersion::V2, &transport);

        let _: Value = bookings.list(RequestOptions::new().param("page", 1)).await.unwrap();
        let _: Value = bookings.get(42).await.unwrap();
        let _: Value = bookings.create(json!({"guest": "A"})).await.unwrap();
        let _: Value = bookings.update(42, json!({"guest": "B"})).await.unwrap();
        let _: Value = bookings.delete(42).await.unwrap();

        let calls: Vec<(Method, String)> = transport
            .calls()
            .into_iter()
            .map(|c| (c.method, c.url))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "http://upstream.test/v2/reservations/bookings".to_string()),
                (Method::GET, "http://upstream.test/v2/reservations/bookings/42".to_string()),
                (Method::POST, "http://upstream.test/v2/reservations/bookings".to_string()),
                (Method::PUT, "http://upstream.test/v2/reservations/bookings/42".to_string()),
                (Method::DELETE, "http://upstream.test/v2/reservations/bookings/42".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_pinned_version_overrides_caller() {
        let transport = Arc::new(MockTransport::always(MockReply::ok(json!({}))));
        let webhooks = module(ModuleVersion::V1, &transport);
        let _: Value = webhooks
            .request(Method::GET, "list", RequestOptions::new().api_version(ApiVersion::V2))
            .await
            .unwrap();
        assert_eq!(transport.calls()[0].url, "http://upstream.test/v1/reservations/bookings/list");
    }

    #[tokio::test]
    async fn test_both_defers_to_caller() {
        let transport = Arc::new(MockTransport::always(MockReply::ok(json!({}))));
        let rates = module(ModuleVersion::Both, &transport);
        let _: Value = rates
            .request(Method::GET, "", RequestOptions::new().api_version(ApiVersion::V1))
            .await
            .unwrap();
        let _: Value = rates.list(RequestOptions::new()).await.unwrap();

        let urls: Vec<String> = transport.calls().into_iter().map(|c| c.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://upstream.test/v1/reservations/bookings".to_string(),
                "http://upstream.test/v2/reservations/bookings".to_string(),
            ]
        );
    }

    #[test]
    fn test_descriptor_normalizes_base_path() {
        let d = ModuleDescriptor::new("rates", ModuleVersion::Both, "/rates/calendar/");
        assert_eq!(d.base_path, "rates/calendar");
    }
}
