//! Subnet client for the Microsoft.Network resource provider.
//!
//! Subnets are child resources of a virtual network, so every operation
//! is scoped by the owning network's name.

use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{SubResource, NETWORK_API_VERSION};

/// An ARM subnet resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SubnetProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table: Option<SubResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_configurations: Vec<SubResource>,
}

/// Rate-limited client for subnet operations.
pub struct SubnetsClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl SubnetsClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str, virtual_network_name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/{}/subnets",
            self.client.subscription_id(),
            resource_group,
            virtual_network_name
        )
    }

    fn resource_path(
        &self,
        resource_group: &str,
        virtual_network_name: &str,
        subnet_name: &str,
    ) -> String {
        format!(
            "{}/{}",
            self.collection_path(resource_group, virtual_network_name),
            subnet_name
        )
    }

    /// Create or update a subnet, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::subnets::create_or_update",
        skip(self, parameters),
        fields(
            resource_group = %resource_group,
            virtual_network_name = %virtual_network_name,
            subnet_name = %subnet_name
        )
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        virtual_network_name: &str,
        subnet_name: &str,
        parameters: &Subnet,
    ) -> ArmResult<Subnet> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, virtual_network_name, subnet_name);
        let response = self.client.put(&path, parameters).await?;
        let subnet = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(subnet)
    }

    /// Delete a subnet, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::subnets::delete",
        skip(self),
        fields(
            resource_group = %resource_group,
            virtual_network_name = %virtual_network_name,
            subnet_name = %subnet_name
        )
    )]
    pub async fn delete(
        &self,
        resource_group: &str,
        virtual_network_name: &str,
        subnet_name: &str,
    ) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, virtual_network_name, subnet_name);
        let response = self.client.delete(&path).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }

    /// Get a subnet, optionally expanding referenced resources.
    #[tracing::instrument(
        name = "arm::subnets::get",
        skip(self),
        fields(
            resource_group = %resource_group,
            virtual_network_name = %virtual_network_name,
            subnet_name = %subnet_name
        )
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        virtual_network_name: &str,
        subnet_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<Subnet> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, virtual_network_name, subnet_name);
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let subnet: Subnet = response.json().await?;

        tracing::debug!("end");
        Ok(subnet)
    }

    /// List the subnets of a virtual network (first page).
    #[tracing::instrument(
        name = "arm::subnets::list",
        skip(self),
        fields(resource_group = %resource_group, virtual_network_name = %virtual_network_name)
    )]
    pub async fn list(
        &self,
        resource_group: &str,
        virtual_network_name: &str,
    ) -> ArmResult<ResourceList<Subnet>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group, virtual_network_name);
        let response = self.client.get(&path).await?;
        let list: ResourceList<Subnet> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_config, TEST_RESOURCE_GROUP, TEST_SUBSCRIPTION};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn subnet_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "properties": {
                "provisioningState": "Succeeded",
                "addressPrefix": "10.0.1.0/24",
                "routeTable": {"id": "/route-table/id"}
            }
        })
    }

    #[tokio::test]
    async fn get_scopes_path_by_virtual_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/vnet-0/subnets/default",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(subnet_json("default")))
            .mount(&server)
            .await;

        let client = SubnetsClient::new(&setup_mock_config(&server));
        let subnet = client
            .get(TEST_RESOURCE_GROUP, "vnet-0", "default", None)
            .await
            .expect("should succeed");

        let properties = subnet.properties.expect("properties");
        assert_eq!(properties.address_prefix.as_deref(), Some("10.0.1.0/24"));
        assert_eq!(
            properties.route_table.expect("route table").id.as_deref(),
            Some("/route-table/id")
        );
    }

    #[tokio::test]
    async fn create_or_update_sends_address_prefix() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/vnet-0/subnets/default",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .and(body_partial_json(serde_json::json!({
                "properties": {"addressPrefix": "10.0.1.0/24"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(subnet_json("default")))
            .mount(&server)
            .await;

        let client = SubnetsClient::new(&setup_mock_config(&server));
        let parameters = Subnet {
            id: None,
            name: None,
            properties: Some(SubnetProperties {
                provisioning_state: None,
                address_prefix: Some("10.0.1.0/24".into()),
                network_security_group: None,
                route_table: None,
                ip_configurations: Vec::new(),
            }),
        };

        let subnet = client
            .create_or_update(TEST_RESOURCE_GROUP, "vnet-0", "default", &parameters)
            .await
            .expect("should succeed");

        assert_eq!(subnet.name.as_deref(), Some("default"));
    }

    #[tokio::test]
    async fn list_returns_all_subnets() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/vnet-0/subnets",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [subnet_json("default"), subnet_json("nodes")]
            })))
            .mount(&server)
            .await;

        let client = SubnetsClient::new(&setup_mock_config(&server));
        let list = client
            .list(TEST_RESOURCE_GROUP, "vnet-0")
            .await
            .expect("should succeed");

        assert_eq!(list.value.len(), 2);
    }
}
