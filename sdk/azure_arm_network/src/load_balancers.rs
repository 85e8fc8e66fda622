//! Load balancer client for the Microsoft.Network resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{SubResource, NETWORK_API_VERSION};

/// An ARM load balancer resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<LoadBalancerProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    // camelCase would produce "frontendIpConfigurations".
    #[serde(
        rename = "frontendIPConfigurations",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub frontend_ip_configurations: Vec<FrontendIpConfiguration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backend_address_pools: Vec<BackendAddressPool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancing_rules: Vec<SubResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub probes: Vec<SubResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inbound_nat_rules: Vec<SubResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<FrontendIpConfigurationProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfigurationProperties {
    #[serde(rename = "privateIPAddress", skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,

    #[serde(
        rename = "privateIPAllocationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<String>,

    #[serde(rename = "publicIPAddress", skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendAddressPool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Rate-limited client for load balancer operations.
pub struct LoadBalancersClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl LoadBalancersClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/loadBalancers",
            self.client.subscription_id(),
            resource_group
        )
    }

    fn resource_path(&self, resource_group: &str, load_balancer_name: &str) -> String {
        format!("{}/{}", self.collection_path(resource_group), load_balancer_name)
    }

    /// Create or update a load balancer, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::load_balancers::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, load_balancer_name = %load_balancer_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        load_balancer_name: &str,
        parameters: &LoadBalancer,
    ) -> ArmResult<LoadBalancer> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, load_balancer_name);
        let response = self.client.put(&path, parameters).await?;
        let load_balancer = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(load_balancer)
    }

    /// Delete a load balancer, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::load_balancers::delete",
        skip(self),
        fields(resource_group = %resource_group, load_balancer_name = %load_balancer_name)
    )]
    pub async fn delete(&self, resource_group: &str, load_balancer_name: &str) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, load_balancer_name);
        let response = self.client.delete(&path).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }

    /// Get a load balancer, optionally expanding referenced resources.
    #[tracing::instrument(
        name = "arm::load_balancers::get",
        skip(self),
        fields(resource_group = %resource_group, load_balancer_name = %load_balancer_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        load_balancer_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<LoadBalancer> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, load_balancer_name);
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let load_balancer: LoadBalancer = response.json().await?;

        tracing::debug!("end");
        Ok(load_balancer)
    }

    /// List the load balancers in a resource group (first page).
    #[tracing::instrument(
        name = "arm::load_balancers::list",
        skip(self),
        fields(resource_group = %resource_group)
    )]
    pub async fn list(&self, resource_group: &str) -> ArmResult<ResourceList<LoadBalancer>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group);
        let response = self.client.get(&path).await?;
        let list: ResourceList<LoadBalancer> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Fetch the next page of a listing by its `nextLink`.
    #[tracing::instrument(name = "arm::load_balancers::list_next", skip(self, next_link))]
    pub async fn list_next(&self, next_link: &str) -> ArmResult<ResourceList<LoadBalancer>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let response = self.client.get_url(next_link).await?;
        let list: ResourceList<LoadBalancer> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }
}
