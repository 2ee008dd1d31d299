//! Response bodies for all handler routes.

mod error_response;

use serde::Serialize;
use snapcdn_storage::AssetLocation;

pub use self::error_response::ErrorResponse;

/// Body of a successful upload: the stored asset's public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Externally addressable URL of the stored asset.
    pub file_url: String,
}

impl From<AssetLocation> for UploadResponse {
    fn from(location: AssetLocation) -> Self {
        Self {
            success: true,
            file_url: location.file_url,
        }
    }
}

/// Body of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Always `true` on the success path; deletes are idempotent.
    pub success: bool,
    /// Number of files removed by a selective delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
}

impl DeleteResponse {
    /// Acknowledges a subtree deletion.
    pub fn acknowledged() -> Self {
        Self {
            success: true,
            removed: None,
        }
    }

    /// Acknowledges a selective deletion with its removal count.
    pub fn swept(removed: usize) -> Self {
        Self {
            success: true,
            removed: Some(removed),
        }
    }
}

/// Body of the liveness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Fixed `"ok"` marker.
    pub status: &'static str,
}

impl HealthResponse {
    /// The one healthy response.
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_uses_camel_case() {
        let response = UploadResponse {
            success: true,
            file_url: "https://cdn.example.test/images/a.png".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"fileUrl\""));
        assert!(json.contains("\"success\":true"));
    }

    #[test]
    fn delete_response_omits_absent_count() {
        let json = serde_json::to_string(&DeleteResponse::acknowledged()).unwrap();
        assert_eq!(json, "{\"success\":true}");

        let json = serde_json::to_string(&DeleteResponse::swept(2)).unwrap();
        assert_eq!(json, "{\"success\":true,\"removed\":2}");
    }

    #[test]
    fn health_response_shape() {
        let json = serde_json::to_string(&HealthResponse::ok()).unwrap();
        assert_eq!(json, "{\"status\":\"ok\"}");
    }
}
