//! Wire types shared across the Microsoft.Compute modules.

use serde::{Deserialize, Serialize};

/// REST API version for Microsoft.Compute virtual machine resources.
pub const COMPUTE_API_VERSION: &str = "2017-12-01";

/// REST API version for Microsoft.Compute managed disk resources.
pub const DISK_API_VERSION: &str = "2017-03-30";

/// SKU of a scale set or other sized compute resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
}

/// Hardware configuration of a virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
}

/// One status entry from an instance view (power state, provisioning, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceViewStatus {
    /// Status code, e.g. `PowerState/running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reference to a network interface attached to a virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterfaceReference {
    pub id: String,
}

/// Network interfaces attached to a virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_view_status_uses_camel_case() {
        let json = serde_json::json!({
            "code": "PowerState/running",
            "level": "Info",
            "displayStatus": "VM running"
        });

        let status: InstanceViewStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.code.as_deref(), Some("PowerState/running"));
        assert_eq!(status.display_status.as_deref(), Some("VM running"));
        assert!(status.message.is_none());
    }

    #[test]
    fn hardware_profile_round_trips() {
        let profile = HardwareProfile {
            vm_size: Some("Standard_D2s_v3".into()),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["vmSize"], "Standard_D2s_v3");
    }
}
