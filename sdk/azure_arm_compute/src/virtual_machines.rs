//! Virtual machine client for the Microsoft.Compute resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::{
    HardwareProfile, InstanceViewStatus, NetworkProfile, COMPUTE_API_VERSION,
};

/// Which child view to expand on a GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceViewTypes {
    /// Include the runtime instance view (power state, statuses).
    InstanceView,
}

impl InstanceViewTypes {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InstanceView => "instanceView",
        }
    }
}

/// An ARM virtual machine resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<VirtualMachineProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    /// Platform-assigned unique VM identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,

    /// Only populated when the GET requested `$expand=instanceView`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_view: Option<VirtualMachineInstanceView>,
}

/// Runtime view of a virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstanceView {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<InstanceViewStatus>,
}

/// Rate-limited client for virtual machine operations.
pub struct VirtualMachinesClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl VirtualMachinesClient {
    /// Wire a virtual machines client from the shared config.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, COMPUTE_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines",
            self.client.subscription_id(),
            resource_group
        )
    }

    fn resource_path(&self, resource_group: &str, vm_name: &str) -> String {
        format!("{}/{}", self.collection_path(resource_group), vm_name)
    }

    /// Create or update a virtual machine, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::virtual_machines::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, vm_name = %vm_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        vm_name: &str,
        parameters: &VirtualMachine,
    ) -> ArmResult<VirtualMachine> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, vm_name);
        let response = self.client.put(&path, parameters).await?;
        let machine = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(machine)
    }

    /// Get a virtual machine, optionally expanding its instance view.
    #[tracing::instrument(
        name = "arm::virtual_machines::get",
        skip(self),
        fields(resource_group = %resource_group, vm_name = %vm_name)
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        vm_name: &str,
        expand: Option<InstanceViewTypes>,
    ) -> ArmResult<VirtualMachine> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, vm_name);
        let response = match expand {
            Some(expand) => {
                self.client
                    .get_with(&path, &[("$expand", expand.as_str())])
                    .await?
            }
            None => self.client.get(&path).await?,
        };
        let machine: VirtualMachine = response.json().await?;

        tracing::debug!("end");
        Ok(machine)
    }

    /// List the virtual machines in a resource group (first page).
    #[tracing::instrument(
        name = "arm::virtual_machines::list",
        skip(self),
        fields(resource_group = %resource_group)
    )]
    pub async fn list(&self, resource_group: &str) -> ArmResult<ResourceList<VirtualMachine>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group);
        let response = self.client.get(&path).await?;
        let list: ResourceList<VirtualMachine> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Fetch the next page of a listing by its `nextLink`.
    #[tracing::instrument(name = "arm::virtual_machines::list_next", skip(self, next_link))]
    pub async fn list_next(&self, next_link: &str) -> ArmResult<ResourceList<VirtualMachine>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let response = self.client.get_url(next_link).await?;
        let list: ResourceList<VirtualMachine> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        config_with_limiter, setup_mock_config, CountingRateLimiter, TEST_RESOURCE_GROUP,
        TEST_SUBSCRIPTION, TEST_TOKEN,
    };
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vm_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/{}",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP, name
            ),
            "name": name,
            "location": "westus",
            "properties": {
                "provisioningState": "Succeeded",
                "hardwareProfile": {"vmSize": "Standard_D2s_v3"},
                "networkProfile": {"networkInterfaces": [{"id": "/nic/1"}]}
            }
        })
    }

    #[test]
    fn virtual_machine_deserializes_arm_shape() {
        let vm: VirtualMachine = serde_json::from_value(vm_json("vm-0")).unwrap();

        assert_eq!(vm.name.as_deref(), Some("vm-0"));
        assert_eq!(vm.location, "westus");

        let properties = vm.properties.expect("properties");
        assert_eq!(properties.provisioning_state.as_deref(), Some("Succeeded"));
        assert_eq!(
            properties
                .hardware_profile
                .expect("hardware profile")
                .vm_size
                .as_deref(),
            Some("Standard_D2s_v3")
        );
        assert!(properties.instance_view.is_none());
    }

    #[test]
    fn serialization_skips_unset_fields() {
        let vm = VirtualMachine {
            id: None,
            name: None,
            location: "eastus".into(),
            tags: None,
            properties: None,
        };

        let json = serde_json::to_value(&vm).unwrap();
        assert_eq!(json, serde_json::json!({"location": "eastus"}));
    }

    #[tokio::test]
    async fn get_requests_expanded_instance_view() {
        let server = MockServer::start().await;

        let mut body = vm_json("vm-0");
        body["properties"]["instanceView"] = serde_json::json!({
            "statuses": [{"code": "PowerState/running", "displayStatus": "VM running"}]
        });

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/vm-0",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .and(query_param("$expand", "instanceView"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = VirtualMachinesClient::new(&setup_mock_config(&server));
        let vm = client
            .get(TEST_RESOURCE_GROUP, "vm-0", Some(InstanceViewTypes::InstanceView))
            .await
            .expect("should succeed");

        let view = vm
            .properties
            .and_then(|p| p.instance_view)
            .expect("instance view");
        assert_eq!(view.statuses[0].code.as_deref(), Some("PowerState/running"));
    }

    #[tokio::test]
    async fn create_or_update_waits_for_operation() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let server = MockServer::start().await;
        let polls = Arc::new(AtomicU32::new(0));
        let counter = polls.clone();

        let vm_path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/vm-0",
            TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
        );
        let operation_url = format!("{}/operations/op-1", server.uri());

        Mock::given(method("PUT"))
            .and(path(vm_path.as_str()))
            .and(body_partial_json(serde_json::json!({"location": "westus"})))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", operation_url.as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(move |_req: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) < 1 {
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"status": "InProgress"}))
                } else {
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"status": "Succeeded"}))
                }
            })
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(vm_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(vm_json("vm-0")))
            .mount(&server)
            .await;

        let client = VirtualMachinesClient::new(&setup_mock_config(&server));
        let parameters: VirtualMachine = serde_json::from_value(vm_json("vm-0")).unwrap();

        let vm = client
            .create_or_update(TEST_RESOURCE_GROUP, "vm-0", &parameters)
            .await
            .expect("should succeed");

        assert_eq!(vm.name.as_deref(), Some("vm-0"));
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn list_follows_next_link() {
        let server = MockServer::start().await;

        let first_page = serde_json::json!({
            "value": [vm_json("vm-0")],
            "nextLink": format!("{}/page2", server.uri())
        });
        let second_page = serde_json::json!({"value": [vm_json("vm-1")]});

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines",
                TEST_SUBSCRIPTION, TEST_RESOURCE_GROUP
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(second_page))
            .mount(&server)
            .await;

        let client = VirtualMachinesClient::new(&setup_mock_config(&server));

        let page = client.list(TEST_RESOURCE_GROUP).await.expect("first page");
        assert_eq!(page.value.len(), 1);
        let next_link = page.next_link.expect("next link");

        let page = client.list_next(&next_link).await.expect("second page");
        assert_eq!(page.value[0].name.as_deref(), Some("vm-1"));
        assert!(page.next_link.is_none());
    }

    #[tokio::test]
    async fn every_call_acquires_the_limiter_once() {
        use std::sync::Arc;

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
            )
            .mount(&server)
            .await;

        let limiter = Arc::new(CountingRateLimiter::default());
        let config = config_with_limiter(&server, limiter.clone());
        let client = VirtualMachinesClient::new(&config);

        client.list(TEST_RESOURCE_GROUP).await.expect("list");
        client.list(TEST_RESOURCE_GROUP).await.expect("list");
        let _ = client.get(TEST_RESOURCE_GROUP, "vm-0", None).await;

        assert_eq!(limiter.admitted(), 3);
    }
}
