//! Network interface client for the Microsoft.Network resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{SubResource, NETWORK_API_VERSION};

/// An ARM network interface resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<NetworkInterfaceProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    /// Whether this is the primary NIC of its virtual machine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_configurations: Vec<InterfaceIpConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine: Option<SubResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceIpConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<InterfaceIpConfigurationProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceIpConfigurationProperties {
    // camelCase would produce "privateIpAddress".
    #[serde(rename = "privateIPAddress", skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,

    #[serde(
        rename = "privateIPAllocationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,

    #[serde(rename = "publicIPAddress", skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_backend_address_pools: Vec<SubResource>,
}

/// Rate-limited client for network interface operations.
pub struct InterfacesClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl InterfacesClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn resource_path(&self, resource_group: &str, network_interface_name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkInterfaces/{}",
            self.client.subscription_id(),
            resource_group,
            network_interface_name
        )
    }

    /// Create or update a network interface, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::interfaces::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, network_interface_name = %network_interface_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        network_interface_name: &str,
        parameters: &NetworkInterface,
    ) -> ArmResult<NetworkInterface> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, network_interface_name);
        let response = self.client.put(&path, parameters).await?;
        let interface = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(interface)
    }

    /// Get a network interface, optionally expanding referenced resources.
    #[tracing::instrument(
        name = "arm::interfaces::get",
        skip(self),
        fields(resource_group = %resource_group, network_interface_name = %network_interface_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        network_interface_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<NetworkInterface> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, network_interface_name);
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let interface: NetworkInterface = response.json().await?;

        tracing::debug!("end");
        Ok(interface)
    }

    /// Get a network interface attached to a scale set instance.
    ///
    /// Scale-set NICs are not addressable under `Microsoft.Network`; they
    /// live under the scale set's own resource path.
    #[tracing::instrument(
        name = "arm::interfaces::get_scale_set_network_interface",
        skip(self),
        fields(
            resource_group = %resource_group,
            scale_set_name = %scale_set_name,
            instance_id = %instance_id,
            network_interface_name = %network_interface_name
        )
    )]
    pub async fn get_scale_set_network_interface(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        instance_id: &str,
        network_interface_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<NetworkInterface> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets/{}/virtualMachines/{}/networkInterfaces/{}",
            self.client.subscription_id(),
            resource_group,
            scale_set_name,
            instance_id,
            network_interface_name
        );
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let interface: NetworkInterface = response.json().await?;

        tracing::debug!("end");
        Ok(interface)
    }
}
