//! Client for virtual machines that belong to a scale set.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{HardwareProfile, InstanceViewStatus, NetworkProfile, COMPUTE_API_VERSION};

/// A single virtual machine inside a scale set, addressed by instance ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<VirtualMachineScaleSetVmProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVmProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_id: Option<String>,

    /// Whether the instance still matches the latest scale set model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_model_applied: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_view: Option<VirtualMachineScaleSetVmInstanceView>,
}

/// Runtime state of a scale set instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineScaleSetVmInstanceView {
    #[serde(default)]
    pub statuses: Vec<InstanceViewStatus>,
}

/// Optional query parameters for [`ScaleSetVmsClient::list`].
///
/// Mirrors the `$filter`, `$select` and `$expand` OData parameters the
/// resource provider accepts on the instance listing.
#[derive(Debug, Clone, Default)]
pub struct ScaleSetVmListOptions {
    pub filter: Option<String>,
    pub select: Option<String>,
    pub expand: Option<String>,
}

/// Rate-limited client for scale set instance operations.
pub struct ScaleSetVmsClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl ScaleSetVmsClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, COMPUTE_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str, scale_set_name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachineScaleSets/{}/virtualMachines",
            self.client.subscription_id(),
            resource_group,
            scale_set_name
        )
    }

    fn instance_path(&self, resource_group: &str, scale_set_name: &str, instance_id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_path(resource_group, scale_set_name),
            instance_id
        )
    }

    /// Get a scale set instance by its instance ID.
    #[tracing::instrument(
        name = "arm::scale_set_vms::get",
        skip(self),
        fields(resource_group = %resource_group, scale_set_name = %scale_set_name, instance_id = %instance_id)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        instance_id: &str,
    ) -> ArmResult<VirtualMachineScaleSetVm> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.instance_path(resource_group, scale_set_name, instance_id);
        let response = self.client.get(&path).await?;
        let vm: VirtualMachineScaleSetVm = response.json().await?;

        tracing::debug!("end");
        Ok(vm)
    }

    /// Get only the instance view of a scale set instance.
    #[tracing::instrument(
        name = "arm::scale_set_vms::get_instance_view",
        skip(self),
        fields(resource_group = %resource_group, scale_set_name = %scale_set_name, instance_id = %instance_id)
    )]
    pub async fn get_instance_view(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        instance_id: &str,
    ) -> ArmResult<VirtualMachineScaleSetVmInstanceView> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = format!(
            "{}/instanceView",
            self.instance_path(resource_group, scale_set_name, instance_id)
        );
        let response = self.client.get(&path).await?;
        let view: VirtualMachineScaleSetVmInstanceView = response.json().await?;

        tracing::debug!("end");
        Ok(view)
    }

    /// List the instances of a scale set (first page).
    #[tracing::instrument(
        name = "arm::scale_set_vms::list",
        skip(self, options),
        fields(resource_group = %resource_group, scale_set_name = %scale_set_name)
    )]
    pub async fn list(
        &self,
        resource_group: &str,
        scale_set_name: &str,
        options: &ScaleSetVmListOptions,
    ) -> ArmResult<ResourceList<VirtualMachineScaleSetVm>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(filter) = options.filter.as_deref() {
            query.push(("$filter", filter));
        }
        if let Some(select) = options.select.as_deref() {
            query.push(("$select", select));
        }
        if let Some(expand) = options.expand.as_deref() {
            query.push(("$expand", expand));
        }

        let path = self.collection_path(resource_group, scale_set_name);
        let response = self.client.get_with(&path, &query).await?;
        let list: ResourceList<VirtualMachineScaleSetVm> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Fetch the next page of an instance listing by its `nextLink`.
    #[tracing::instrument(name = "arm::scale_set_vms::list_next", skip(self, next_link))]
    pub async fn list_next(
        &self,
        next_link: &str,
    ) -> ArmResult<ResourceList<VirtualMachineScaleSetVm>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let response = self.client.get_url(next_link).await?;
        let list: ResourceList<VirtualMachineScaleSetVm> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }
}
