//! Integration tests for azure_arm_network.
//!
//! These tests require a live Azure subscription.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `AZURE_SUBSCRIPTION_ID`: The subscription to run against
//! - `AZURE_ARM_TOKEN`: A bearer token for the ARM endpoint
//! - `AZURE_TEST_RESOURCE_GROUP`: An existing resource group the token can read

#![cfg(feature = "integration-tests")]

use std::sync::Arc;

use azure_arm_core::auth::ArmCredential;
use azure_arm_core::config::ClientConfig;
use azure_arm_core::rate_limit::TokenBucketRateLimiter;
use azure_arm_network::load_balancers::LoadBalancersClient;
use azure_arm_network::public_ip_addresses::PublicIpAddressesClient;
use azure_arm_network::security_groups::SecurityGroupsClient;

fn get_config() -> ClientConfig {
    let subscription_id =
        std::env::var("AZURE_SUBSCRIPTION_ID").expect("AZURE_SUBSCRIPTION_ID not set");

    ClientConfig::builder()
        .subscription_id(subscription_id)
        .credential(ArmCredential::from_env().expect("AZURE_ARM_TOKEN not set"))
        .rate_limiter(Arc::new(TokenBucketRateLimiter::new(10.0, 100)))
        .build()
        .expect("Failed to build config")
}

fn get_resource_group() -> String {
    std::env::var("AZURE_TEST_RESOURCE_GROUP").expect("AZURE_TEST_RESOURCE_GROUP not set")
}

#[tokio::test]
async fn test_list_load_balancers() {
    let config = get_config();
    let client = LoadBalancersClient::new(&config);

    let mut page = client
        .list(&get_resource_group())
        .await
        .expect("list load balancers");
    let mut total = page.value.len();

    while let Some(next_link) = page.next_link.clone() {
        page = client.list_next(&next_link).await.expect("list next page");
        total += page.value.len();
    }

    println!("found {total} load balancers");
}

#[tokio::test]
async fn test_list_public_ip_addresses() {
    let config = get_config();
    let client = PublicIpAddressesClient::new(&config);

    let page = client
        .list(&get_resource_group())
        .await
        .expect("list public IPs");

    for public_ip in &page.value {
        assert!(public_ip.name.is_some());
    }
}

#[tokio::test]
async fn test_list_security_groups() {
    let config = get_config();
    let client = SecurityGroupsClient::new(&config);

    let page = client
        .list(&get_resource_group())
        .await
        .expect("list security groups");

    println!("found {} security groups", page.value.len());
}
