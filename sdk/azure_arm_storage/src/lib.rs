//! # Azure ARM Storage
//!
//! Rate-limited client for the Microsoft.Storage resource provider.
//!
//! The client is built from a shared [`ClientConfig`](azure_arm_core::config::ClientConfig)
//! and acquires the config's rate limiter once before each remote call.
//! Account creation drives the ARM long-running operation to completion
//! before returning; account deletion completes synchronously.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_arm_core::auth::ArmCredential;
//! use azure_arm_core::config::ClientConfig;
//! use azure_arm_storage::accounts::StorageAccountsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .subscription_id("11111111-2222-3333-4444-555555555555")
//!         .credential(ArmCredential::bearer_token("an-arm-access-token"))
//!         .build()?;
//!
//!     let client = StorageAccountsClient::new(&config);
//!     let keys = client.list_keys("my-resource-group", "mystorageaccount").await?;
//!     println!("{} keys", keys.keys.len());
//!
//!     Ok(())
//! }
//! ```

pub mod accounts;
