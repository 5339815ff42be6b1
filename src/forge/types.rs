//! Release resources, request bodies and download responses.
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Release resource as returned by the API. Fields this tool does not use
/// are kept in `extra` so the full representation can be printed back.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Asset attached to a release.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Request body to create a new release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReleaseRequest {
    pub tag_name: String,
    pub name: String,
    pub draft: bool,
}

/// Partial update of a release. Unset fields are left out of the payload.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct UpdateReleaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

/// Stream of body chunks from a download response.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// Outcome of a single, non-following HTTP GET.
pub enum FetchResponse {
    /// 301 or 302 with the raw `Location` header value.
    Redirect { status: u16, location: String },
    /// 200 with the response body.
    Content(ByteStream),
    /// Any other status.
    Status(u16),
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redirect { status, location } => f
                .debug_struct("Redirect")
                .field("status", status)
                .field("location", location)
                .finish(),
            Self::Content(_) => f.write_str("Content(..)"),
            Self::Status(status) => {
                f.debug_tuple("Status").field(status).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_keeps_unknown_fields() {
        let json = r#"{
            "id": 42,
            "tag_name": "v1.0",
            "name": "v1.0",
            "draft": true,
            "body": null,
            "html_url": "https://github.com/o/r/releases/tag/v1.0"
        }"#;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.id, 42);
        assert_eq!(release.tag_name, "v1.0");
        assert!(release.draft);
        assert!(release.body.is_none());

        let value = serde_json::to_value(&release).unwrap();
        assert_eq!(
            value["html_url"],
            "https://github.com/o/r/releases/tag/v1.0"
        );
    }

    #[test]
    fn update_request_omits_unset_fields() {
        let req = UpdateReleaseRequest {
            draft: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({ "draft": false }));
    }
}
