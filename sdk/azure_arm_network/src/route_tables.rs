//! Route table client for the Microsoft.Network resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{SubResource, NETWORK_API_VERSION};
use crate::routes::Route;

/// An ARM route table resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RouteTableProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTableProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<SubResource>,
}

/// Rate-limited client for route table operations.
pub struct RouteTablesClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl RouteTablesClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn resource_path(&self, resource_group: &str, route_table_name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/routeTables/{}",
            self.client.subscription_id(),
            resource_group,
            route_table_name
        )
    }

    /// Create or update a route table, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::route_tables::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, route_table_name = %route_table_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        route_table_name: &str,
        parameters: &RouteTable,
    ) -> ArmResult<RouteTable> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, route_table_name);
        let response = self.client.put(&path, parameters).await?;
        let route_table = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(route_table)
    }

    /// Get a route table, optionally expanding referenced resources.
    #[tracing::instrument(
        name = "arm::route_tables::get",
        skip(self),
        fields(resource_group = %resource_group, route_table_name = %route_table_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        route_table_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<RouteTable> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, route_table_name);
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let route_table: RouteTable = response.json().await?;

        tracing::debug!("end");
        Ok(route_table)
    }
}
