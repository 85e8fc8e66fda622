//! Public IP address client for the Microsoft.Network resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::NETWORK_API_VERSION;

/// An ARM public IP address resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PublicIpAddressProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    // camelCase would produce "publicIpAllocationMethod".
    #[serde(
        rename = "publicIPAllocationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_allocation_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<PublicIpAddressDnsSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressDnsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

/// Rate-limited client for public IP address operations.
pub struct PublicIpAddressesClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl PublicIpAddressesClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/publicIPAddresses",
            self.client.subscription_id(),
            resource_group
        )
    }

    fn resource_path(&self, resource_group: &str, public_ip_name: &str) -> String {
        format!("{}/{}", self.collection_path(resource_group), public_ip_name)
    }

    /// Create or update a public IP address, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::public_ip_addresses::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, public_ip_name = %public_ip_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        public_ip_name: &str,
        parameters: &PublicIpAddress,
    ) -> ArmResult<PublicIpAddress> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, public_ip_name);
        let response = self.client.put(&path, parameters).await?;
        let public_ip = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(public_ip)
    }

    /// Delete a public IP address, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::public_ip_addresses::delete",
        skip(self),
        fields(resource_group = %resource_group, public_ip_name = %public_ip_name)
    )]
    pub async fn delete(&self, resource_group: &str, public_ip_name: &str) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, public_ip_name);
        let response = self.client.delete(&path).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }

    /// Get a public IP address, optionally expanding referenced resources.
    #[tracing::instrument(
        name = "arm::public_ip_addresses::get",
        skip(self),
        fields(resource_group = %resource_group, public_ip_name = %public_ip_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        public_ip_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<PublicIpAddress> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, public_ip_name);
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let public_ip: PublicIpAddress = response.json().await?;

        tracing::debug!("end");
        Ok(public_ip)
    }

    /// List the public IP addresses in a resource group (first page).
    #[tracing::instrument(
        name = "arm::public_ip_addresses::list",
        skip(self),
        fields(resource_group = %resource_group)
    )]
    pub async fn list(&self, resource_group: &str) -> ArmResult<ResourceList<PublicIpAddress>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group);
        let response = self.client.get(&path).await?;
        let list: ResourceList<PublicIpAddress> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Fetch the next page of a listing by its `nextLink`.
    #[tracing::instrument(name = "arm::public_ip_addresses::list_next", skip(self, next_link))]
    pub async fn list_next(&self, next_link: &str) -> ArmResult<ResourceList<PublicIpAddress>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let response = self.client.get_url(next_link).await?;
        let list: ResourceList<PublicIpAddress> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }
}
