//! Managed disk client for the Microsoft.Compute resource provider.
//!
//! Disks live behind their own API version, older than the rest of the
//! compute surface.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::models::DISK_API_VERSION;

/// An ARM managed disk resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<DiskProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    // camelCase would produce "diskSizeGb".
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_data: Option<CreationData>,
}

/// How the disk's contents are sourced at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationData {
    pub create_option: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_resource_id: Option<String>,
}

/// Rate-limited client for managed disk operations.
pub struct DisksClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl DisksClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, DISK_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn resource_path(&self, resource_group: &str, disk_name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/disks/{}",
            self.client.subscription_id(),
            resource_group,
            disk_name
        )
    }

    /// Create or update a managed disk, waiting for provisioning to finish.
    #[tracing::instrument(
        name = "arm::disks::create_or_update",
        skip(self, parameters),
        fields(resource_group = %resource_group, disk_name = %disk_name)
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        disk_name: &str,
        parameters: &Disk,
    ) -> ArmResult<Disk> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, disk_name);
        let response = self.client.put(&path, parameters).await?;
        let disk = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(disk)
    }

    /// Delete a managed disk, waiting for the operation to finish.
    #[tracing::instrument(
        name = "arm::disks::delete",
        skip(self),
        fields(resource_group = %resource_group, disk_name = %disk_name)
    )]
    pub async fn delete(&self, resource_group: &str, disk_name: &str) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, disk_name);
        let response = self.client.delete(&path).await?;
        self.client.wait_for_operation(response).await?;

        tracing::debug!("end");
        Ok(())
    }

    /// Get a managed disk.
    #[tracing::instrument(
        name = "arm::disks::get",
        skip(self),
        fields(resource_group = %resource_group, disk_name = %disk_name)
    )]
    pub async fn get(&self, resource_group: &str, disk_name: &str) -> ArmResult<Disk> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, disk_name);
        let response = self.client.get(&path).await?;
        let disk: Disk = response.json().await?;

        tracing::debug!("end");
        Ok(disk)
    }
}
