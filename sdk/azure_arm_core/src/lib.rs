#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use config::ClientConfig;
pub use error::ArmError;
