//! Storage account client for the Microsoft.Storage resource provider.

use std::collections::HashMap;
use std::sync::Arc;

use azure_arm_core::client::ArmClient;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::ResourceList;
use azure_arm_core::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};

/// API version sent with every Microsoft.Storage request.
pub const STORAGE_API_VERSION: &str = "2017-10-01";

/// An ARM storage account resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<AccountSku>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<AccountProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_endpoints: Option<AccountEndpoints>,
}

/// Service endpoints exposed by an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEndpoints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSku {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

/// Request body for [`StorageAccountsClient::create`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreateParameters {
    pub sku: AccountSku,

    pub kind: String,

    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
}

/// One access key of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

/// Response body of the `listKeys` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListKeysResult {
    #[serde(default)]
    pub keys: Vec<AccountKey>,
}

/// Rate-limited client for storage account operations.
pub struct StorageAccountsClient {
    client: ArmClient,
    limiter: Arc<dyn RateLimiter>,
}

impl StorageAccountsClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ArmClient::new(config, STORAGE_API_VERSION),
            limiter: config.rate_limiter(),
        }
    }

    fn collection_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts",
            self.client.subscription_id(),
            resource_group
        )
    }

    fn resource_path(&self, resource_group: &str, account_name: &str) -> String {
        format!("{}/{}", self.collection_path(resource_group), account_name)
    }

    /// Create a storage account, waiting for provisioning to finish.
    #[tracing::instrument(
        name = "arm::storage_accounts::create",
        skip(self, parameters),
        fields(resource_group = %resource_group, account_name = %account_name)
    )]
    pub async fn create(
        &self,
        resource_group: &str,
        account_name: &str,
        parameters: &AccountCreateParameters,
    ) -> ArmResult<Account> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, account_name);
        let response = self.client.put(&path, parameters).await?;
        let account = self.client.wait_for_completion(response, &path).await?;

        tracing::debug!("end");
        Ok(account)
    }

    /// Delete a storage account. The resource provider completes deletes
    /// synchronously, so there is no operation to poll.
    #[tracing::instrument(
        name = "arm::storage_accounts::delete",
        skip(self),
        fields(resource_group = %resource_group, account_name = %account_name)
    )]
    pub async fn delete(&self, resource_group: &str, account_name: &str) -> ArmResult<()> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, account_name);
        self.client.delete(&path).await?;

        tracing::debug!("end");
        Ok(())
    }

    /// List the access keys of an account.
    #[tracing::instrument(
        name = "arm::storage_accounts::list_keys",
        skip(self),
        fields(resource_group = %resource_group, account_name = %account_name)
    )]
    pub async fn list_keys(
        &self,
        resource_group: &str,
        account_name: &str,
    ) -> ArmResult<AccountListKeysResult> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = format!("{}/listKeys", self.resource_path(resource_group, account_name));
        let response = self.client.post_empty(&path).await?;
        let keys: AccountListKeysResult = response.json().await?;

        tracing::debug!(count = keys.keys.len(), "end");
        Ok(keys)
    }

    /// List the storage accounts in a resource group.
    #[tracing::instrument(
        name = "arm::storage_accounts::list_by_resource_group",
        skip(self),
        fields(resource_group = %resource_group)
    )]
    pub async fn list_by_resource_group(
        &self,
        resource_group: &str,
    ) -> ArmResult<ResourceList<Account>> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.collection_path(resource_group);
        let response = self.client.get(&path).await?;
        let list: ResourceList<Account> = response.json().await?;

        tracing::debug!(count = list.value.len(), "end");
        Ok(list)
    }

    /// Get the properties of an account.
    #[tracing::instrument(
        name = "arm::storage_accounts::get_properties",
        skip(self),
        fields(resource_group = %resource_group, account_name = %account_name)
    )]
    pub async fn get_properties(
        &self,
        resource_group: &str,
        account_name: &str,
    ) -> ArmResult<Account> {
        self.limiter.acquire().await;
        tracing::debug!("start");

        let path = self.resource_path(resource_group, account_name);
        let response = self.client.get(&path).await?;
        let account: Account = response.json().await?;

        tracing::debug!("end");
        Ok(account)
    }
}
