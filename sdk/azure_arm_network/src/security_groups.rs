//! Network security group client for the Microsoft.Network resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::NETWORK_API_VERSION;

/// An ARM network security group resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
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
    pub properties: Option<SecurityGroupProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_rules: Vec<SecurityRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SecurityRuleProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// Rate-limited client for network security group operations.
pub struct SecurityGroupsClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl SecurityGroupsClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, NETWORK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkSecurityGroups",
            self.client.subscription_id(),
            resource_group
        )
    }

    fn resource_path(&self, resource_group: &str, security_group_name: &str) -> String {
        format!("{}/{}", self.collection_path(resource_group), security_group_name)
    }

    /// Create or update a security group, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::security_groups::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, security_group_name = %security_group_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        security_group_name: &str,
        parameters: &SecurityGroup,
    ) -> ArmResult<SecurityGroup> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, security_group_name);
        let response = self.client.put(&path, parameters).await?;
        let security_group = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(security_group)
    }

    /// Delete a security group, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::security_groups::delete",
        skip(self),
        fields(resource_group = %resource_group, security_group_name = %security_group_name)
    )]
    pub async fn delete(&self, resource_group: &str, security_group_name: &str) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, security_group_name);
        let response = self.client.delete(&path).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }

    /// Get a security group, optionally expanding referenced resources.
    #[tracing::instrument(
        name = "arm::security_groups::get",
        skip(self),
        fields(resource_group = %resource_group, security_group_name = %security_group_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        security_group_name: &str,
        expand: Option<&str>,
    ) -> ArmResult<SecurityGroup> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, security_group_name);
        let response = match expand {
            Some(expand) => self.client.get_with(&path, &[("$expand", expand)]).await?,
            None => self.client.get(&path).await?,
        };
        let security_group: SecurityGroup = response.json().await?;

        tracing::debug!("end");
        Ok(security_group)
    }

    /// List the security groups in a resource group (first page).
    #[tracing::instrument(
        name = "arm::security_groups::list",
        skip(self),
        fields(resource_group = %resource_group)
    )]
    pub async fn list(&self, resource_group: &str) -> ArmResult<ResourceList<SecurityGroup>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group);
        let response = self.client.get(&path).await?;
        let list: ResourceList<SecurityGroup> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_config, TEST_RESOURCE_GROUP, TEST_SUBSCRIPTION};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn security_group_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "location": "westus",
            "etag": "W/\"etag-1\"",
            "properties": {
                "provisioningState": "Succeeded",
                "securityRules": [{
                    "name": "allow-ssh",
                    "properties": {
                        "protocol": "Tcp",
                        "destinationPortRange": "22",
                        "access": "Allow",
                        "priority": 100,
                        "direction": "Inbound"
                    }
                }]
            }
        })
    }

    #[test]
    fn rules_deserialize_arm_shape() {
        let group: SecurityGroup = serde_json::from_value(security_group_json("nsg-0")).unwrap();
        assert_eq!(group.etag.as_deref(), Some("W/\"etag-1\""));
        let rule = &group.properties.expect("properties").security_rules[0];
        let properties = rule.properties.as_ref().expect("rule properties");
        assert_eq!(properties.priority, Some(100));
        assert_eq!(properties.direction.as_deref(), Some("Inbound"));
    }

    #[tokio::test]
    async fn get_returns_security_group() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkSecurityGroups/nsg-0",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(security_group_json("nsg-0")))
            .mount(&server)
            .await;

        let client = SecurityGroupsClient::new(&setup_mock_config(&server));
        let group = client
            .get(TEST_RESOURCE_GROUP, "nsg-0", None)
            .await
            .expect("should succeed");

        assert_eq!(group.name.as_deref(), Some("nsg-0"));
    }

    #[tokio::test]
    async fn list_returns_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkSecurityGroups",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [security_group_json("nsg-0")]
            })))
            .mount(&server)
            .await;

        let client = SecurityGroupsClient::new(&setup_mock_config(&server));
        let list = client.list(TEST_RESOURCE_GROUP).await.expect("should succeed");

        assert_eq!(list.value.len(), 1);
    }
}
