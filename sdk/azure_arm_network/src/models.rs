//! Shared types for the Microsoft.Network resource provider.

use serde::{Deserialize, Serialize};

/// API version sent with every Microsoft.Network request.
pub const NETWORK_API_VERSION: &str = "2017-10-01";

/// Reference to another ARM resource by ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_resource_serializes_only_id() {
        let reference = SubResource::new("/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/subnets/a");
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/subnets/a"})
        );
    }
}
