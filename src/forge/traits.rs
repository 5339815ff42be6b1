//! Traits for the remote release API and raw asset downloads
use async_trait::async_trait;
use url::Url;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::types::{
        Asset, CreateReleaseRequest, FetchResponse, Release,
        UpdateReleaseRequest,
    },
};

/// Release endpoints of the repository API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release>;
    async fn get_release(&self, release_id: u64) -> Result<Release>;
    async fn update_release(
        &self,
        release_id: u64,
        req: UpdateReleaseRequest,
    ) -> Result<Release>;
    async fn list_release_assets(&self, release_id: u64) -> Result<Vec<Asset>>;
    async fn upload_release_asset(
        &self,
        release_id: u64,
        name: &str,
        content: Vec<u8>,
    ) -> Result<Asset>;
}

/// Single HTTP GET that reports redirects instead of following them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse>;
}
