//! Wire types shared across all ARM resource crates.

use serde::Deserialize;

/// A paged ARM list response.
///
/// A missing `nextLink` means the listing is complete; resource clients
/// expose a `list_next` operation that follows the link verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList<T> {
    /// The resources in this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Absolute URL of the next page, if any.
    pub next_link: Option<String>,
}

/// Body returned while polling an `Azure-AsyncOperation` URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    /// Operation ID, when the service reports one.
    pub name: Option<String>,

    /// `InProgress`, `Succeeded`, `Failed`, or `Canceled`.
    pub status: String,

    /// Failure details for terminal non-success states.
    pub error: Option<OperationError>,
}

/// Error details attached to a failed or canceled operation.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl OperationStatus {
    /// Whether the operation has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "Succeeded" | "Failed" | "Canceled")
    }

    /// Whether the operation finished successfully.
    pub fn succeeded(&self) -> bool {
        self.status == "Succeeded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults_to_empty_page() {
        let list: ResourceList<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(list.value.is_empty());
        assert!(list.next_link.is_none());
    }

    #[test]
    fn list_deserializes_next_link() {
        let json = serde_json::json!({
            "value": [{"name": "a"}, {"name": "b"}],
            "nextLink": "https://management.azure.com/page2"
        });

        let list: ResourceList<serde_json::Value> = serde_json::from_value(json).unwrap();
        assert_eq!(list.value.len(), 2);
        assert_eq!(
            list.next_link.as_deref(),
            Some("https://management.azure.com/page2")
        );
    }

    #[test]
    fn operation_status_terminal_states() {
        for (status, terminal, ok) in [
            ("InProgress", false, false),
            ("Succeeded", true, true),
            ("Failed", true, false),
            ("Canceled", true, false),
        ] {
            let op = OperationStatus {
                name: None,
                status: status.into(),
                error: None,
            };
            assert_eq!(op.is_terminal(), terminal, "status {}", status);
            assert_eq!(op.succeeded(), ok, "status {}", status);
        }
    }

    #[test]
    fn operation_status_carries_error_details() {
        let json = serde_json::json!({
            "status": "Failed",
            "error": {"code": "OverconstrainedAllocation", "message": "no capacity"}
        });

        let op: OperationStatus = serde_json::from_value(json).unwrap();
        assert!(op.is_terminal());
        let error = op.error.expect("error details");
        assert_eq!(error.code.as_deref(), Some("OverconstrainedAllocation"));
        assert_eq!(error.message.as_deref(), Some("no capacity"));
    }
}
