//! Route client for the Microsoft.Network resource provider.
//!
//! Routes are child resources of a route table, so every operation is
//! scoped by the owning table's name.

use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::NETWORK_API_VERSION;

/// An ARM route resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RouteProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_ip_address: Option<String>,
}

/// Rate-limited client for route operations.
pub struct RoutesClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl RoutesClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn resource_path(
        &self,
        resource_group: &str,
        route_table_name: &str,
        route_name: &str,
    ) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/routeTables/{}/routes/{}",
            self.client.subscription_id(),
            resource_group,
            route_table_name,
            route_name
        )
    }

    /// Create or update a route, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::routes::create_or_update",
        skip(self, parameters),
        fields(
            resource_group = %resource_group,
            route_table_name = %route_table_name,
            route_name = %route_name
        )
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        route_table_name: &str,
        route_name: &str,
        parameters: &Route,
    ) -> ArmResult<Route> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, route_table_name, route_name);
        let response = self.client.put(&path, parameters).await?;
        let route = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(route)
    }

    /// Delete a route, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::routes::delete",
        skip(self),
        fields(
            resource_group = %resource_group,
            route_table_name = %route_table_name,
            route_name = %route_name
        )
    )]
    pub async fn delete(
        &self,
        resource_group: &str,
        route_table_name: &str,
        route_name: &str,
    ) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, route_table_name, route_name);
        let response = self.client.delete(&path).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }
}
