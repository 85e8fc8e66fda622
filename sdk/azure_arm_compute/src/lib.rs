//! # Azure ARM Compute
//!
//! Rate-limited clients for the Microsoft.Compute resource provider:
//! virtual machines, virtual machine scale sets, scale-set VM instances,
//! and managed disks.
//!
//! Every client is built from a shared [`ClientConfig`](azure_arm_core::config::ClientConfig)
//! and acquires the config's rate limiter once before each remote call.
//! Create/update/delete operations drive the ARM long-running operation to
//! completion before returning.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_arm_core::auth::ArmCredential;
//! use azure_arm_core::config::ClientConfig;
//! use azure_arm_compute::virtual_machines::VirtualMachinesClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .subscription_id("11111111-2222-3333-4444-555555555555")
//!         .credential(ArmCredential::bearer_token("an-arm-access-token"))
//!         .build()?;
//!
//!     let client = VirtualMachinesClient::new(&config);
//!     let machines = client.list("my-resource-group").await?;
//!     for vm in machines.value {
//!         println!("{}", vm.name.unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`virtual_machines`] - Create, get, and list virtual machines
//! - [`scale_sets`] - Manage virtual machine scale sets and upgrade instances
//! - [`scale_set_vms`] - Inspect individual scale-set VM instances
//! - [`disks`] - Create, get, and delete managed disks

pub mod disks;
pub mod models;
pub mod scale_set_vms;
pub mod scale_sets;
pub mod virtual_machines;
