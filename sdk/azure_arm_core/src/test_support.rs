//! Helpers for exercising clients against a local mock server.
//!
//! Exposed to the resource crates under the `test-support` feature.

use std::time::Duration;

use wiremock::MockServer;

use crate::auth::ArmCredential;
use crate::config::ClientConfig;

/// Test subscription ID (not a real subscription).
pub const TEST_SUBSCRIPTION: &str = "11111111-2222-3333-4444-555555555555";

/// Resource group used in test paths.
pub const TEST_RESOURCE_GROUP: &str = "test-rg";

/// Test bearer token (not a real token).
pub const TEST_TOKEN: &str = "test-token";

/// Create a client config pointed at a mock server, with a short polling
/// interval so long-running-operation tests finish quickly.
pub fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .subscription_id(TEST_SUBSCRIPTION)
        .resource_manager_endpoint(server.uri())
        .credential(ArmCredential::bearer_token(TEST_TOKEN))
        .polling_interval(Duration::from_millis(10))
        .build()
        .expect("should build config")
}
