//! Virtual machine scale set client for the Microsoft.Compute resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{Sku, COMPUTE_API_VERSION};

/// An ARM virtual machine scale set resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<VirtualMachineScaleSetProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overprovision: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_policy: Option<UpgradePolicy>,

    /// Scale-set-wide unique ID assigned by the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

/// How instances are brought to the latest scale set model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Instance IDs targeted by a manual upgrade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVmInstanceRequiredIds {
    pub instance_ids: Vec<String>,
}

/// Rate-limited client for scale set operations.
pub struct ScaleSetsClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl ScaleSetsClient {
    /// Wire a scale sets client from the shared config.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, COMPUTE_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets",
            self.client.subscription_id(),
            resource_group
        )
    }

    fn resource_path(&self, resource_group: &str, scale_set_name: &str) -> String {
        format!("{}/{}", self.collection_path(resource_group), scale_set_name)
    }

    /// Create or update a scale set, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::scale_sets::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, scale_set_name = %scale_set_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        parameters: &VirtualMachineScaleSet,
    ) -> ArmResult<VirtualMachineScaleSet> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, scale_set_name);
        let response = self.client.put(&path, parameters).await?;
        let scale_set = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(scale_set)
    }

    /// Get a scale set.
    #[tracing::instrument(
        name = "arm::scale_sets::get",
        skip(self),
        fields(resource_group = %resource_group, scale_set_name = %scale_set_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        scale_set_name: &str,
    ) -> ArmResult<VirtualMachineScaleSet> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, scale_set_name);
        let response = self.client.get(&path).await?;
        let scale_set: VirtualMachineScaleSet = response.json().await?;

        tracing::debug!("end");
        Ok(scale_set)
    }

    /// List the scale sets in a resource group (first page).
    #[tracing::instrument(
        name = "arm::scale_sets::list",
        skip(self),
        fields(resource_group = %resource_group)
    )]
    pub async fn list(
        &self,
        resource_group: &str,
    ) -> ArmResult<ResourceList<VirtualMachineScaleSet>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group);
        let response = self.client.get(&path).await?;
        let list: ResourceList<VirtualMachineScaleSet> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Fetch the next page of a listing by its `nextLink`.
    #[tracing::instrument(name = "arm::scale_sets::list_next", skip(self, next_link))]
    pub async fn list_next(
        &self,
        next_link: &str,
    ) -> ArmResult<ResourceList<VirtualMachineScaleSet>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let response = self.client.get_url(next_link).await?;
        let list: ResourceList<VirtualMachineScaleSet> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Manually upgrade the given instances to the latest scale set model,
    /// waiting for the upgrade operation to finish.
    #[tracing::instrument(
        name = "arm::scale_sets::update_instances",
        skip(self, instance_ids),
        fields(resource_group = %resource_group, scale_set_name = %scale_set_name)
    )]
    pub async fn update_instances(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        instance_ids: &VirtualMachineScaleSetVmInstanceRequiredIds,
    ) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!(instances = instance_ids.instance_ids.len(), "start");

        let path = format!(
            "{}/manualupgrade",
            self.resource_path(resource_group, scale_set_name)
        );
        let response = self.client.post(&path, instance_ids).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_config, TEST_RESOURCE_GROUP, TEST_SUBSCRIPTION};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scale_set_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "location": "westus",
            "sku": {"name": "Standard_D2s_v3", "tier": "Standard", "capacity": 3},
            "properties": {
                "provisioningState": "Succeeded",
                "overprovision": true,
                "upgradePolicy": {"mode": "Manual"},
                "uniqueId": "f1e2d3c4"
            }
        })
    }

    #[test]
    fn scale_set_deserializes_arm_shape() {
        let scale_set: VirtualMachineScaleSet =
            serde_json::from_value(scale_set_json("vmss-0")).unwrap();

        assert_eq!(scale_set.sku.expect("sku").capacity, Some(3));
        let properties = scale_set.properties.expect("properties");
        assert_eq!(properties.upgrade_policy.expect("policy").mode.as_deref(), Some("Manual"));
        assert_eq!(properties.unique_id.as_deref(), Some("f1e2d3c4"));
    }

    #[test]
    fn instance_ids_serialize_to_camel_case() {
        let ids = VirtualMachineScaleSetVmInstanceRequiredIds {
            instance_ids: vec!["0".into(), "3".into()],
        };

        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(json, serde_json::json!({"instanceIds": ["0", "3"]}));
    }

    #[tokio::test]
    async fn get_returns_scale_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets/vmss-0",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(scale_set_json("vmss-0")))
            .mount(&server)
            .await;

        let client = ScaleSetsClient::new(&setup_mock_config(&server));
        let scale_set = client
            .get(TEST_RESOURCE_GROUP, "vmss-0")
            .await
            .expect("should succeed");

        assert_eq!(scale_set.name.as_deref(), Some("vmss-0"));
    }

    #[tokio::test]
    async fn update_instances_posts_manual_upgrade() {
        let server = MockServer::start().await;

        let operation_url = format!("{}/operations/upgrade-1", server.uri());

        Mock::given(method("POST"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets/vmss-0/manualupgrade",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .and(body_json(serde_json::json!({"instanceIds": ["1", "2"]})))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", operation_url.as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/upgrade-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "Succeeded"})),
            )
            .mount(&server)
            .await;

        let client = ScaleSetsClient::new(&setup_mock_config(&server));
        let ids = VirtualMachineScaleSetVmInstanceRequiredIds {
            instance_ids: vec!["1".into(), "2".into()],
        };

        client
            .update_instances(TEST_RESOURCE_GROUP, "vmss-0", &ids)
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn list_returns_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [scale_set_json("vmss-0"), scale_set_json("vmss-1")]
            })))
            .mount(&server)
            .await;

        let client = ScaleSetsClient::new(&setup_mock_config(&server));
        let list = client.list(TEST_RESOURCE_GROUP).await.expect("should succeed");

        assert_eq!(list.value.len(), 2);
        assert!(list.next_link.is_none());
    }
}
