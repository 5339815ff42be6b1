//! Configuration for the remote release API connection.
use secrecy::SecretString;
use url::Url;

/// Default REST API base URL for github.com.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default base URL of the asset upload endpoint for github.com.
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com";
/// REST API version header value sent with every API request.
pub const API_VERSION: &str = "2022-11-28";
/// User agent sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("release-helper/", env!("CARGO_PKG_VERSION"));

/// Remote repository connection configuration for authenticating and
/// interacting with the release API.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// REST API base URL.
    pub api_url: Url,
    /// Base URL for asset uploads.
    pub upload_url: Url,
    /// Access token for authentication.
    pub token: SecretString,
}

impl RemoteConfig {
    /// Repository identifier in `owner/name` form.
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
