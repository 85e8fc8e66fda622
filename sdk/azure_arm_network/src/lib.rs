//! # Azure ARM Network
//!
//! Rate-limited clients for the Microsoft.Network resource provider:
//! network interfaces, load balancers, public IP addresses, subnets,
//! network security groups, route tables, and routes.
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
//! use azure_arm_network::interfaces::InterfacesClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .subscription_id("11111111-2222-3333-4444-555555555555")
//!         .credential(ArmCredential::bearer_token("an-arm-access-token"))
//!         .build()?;
//!
//!     let client = InterfacesClient::new(&config);
//!     let nic = client.get("my-resource-group", "my-nic", None).await?;
//!     println!("{:?}", nic.name);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`interfaces`] - Network interfaces, including scale-set NICs
//! - [`load_balancers`] - Load balancers
//! - [`public_ip_addresses`] - Public IP addresses
//! - [`subnets`] - Subnets within a virtual network
//! - [`security_groups`] - Network security groups
//! - [`route_tables`] - Route tables
//! - [`routes`] - Routes within a route table

pub mod interfaces;
pub mod load_balancers;
pub mod models;
pub mod public_ip_addresses;
pub mod route_tables;
pub mod routes;
pub mod security_groups;
pub mod subnets;
