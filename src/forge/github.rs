//! Implements the release API and asset fetcher for GitHub
use async_trait::async_trait;
use color_eyre::eyre::{Report, WrapErr};
use futures_util::StreamExt;
use log::*;
use reqwest::{
    Client, StatusCode,
    header::{
        ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap,
        HeaderValue, LOCATION,
    },
    redirect,
};
use secrecy::ExposeSecret;
use url::Url;

use crate::{
    Result,
    error::ReleaseHelperError,
    forge::{
        config::{API_VERSION, RemoteConfig, USER_AGENT},
        traits::{AssetFetcher, ReleaseApi},
        types::{
            Asset, CreateReleaseRequest, FetchResponse, Release,
            UpdateReleaseRequest,
        },
    },
};

/// Page size used when listing release assets.
const ASSETS_PAGE_SIZE: usize = 100;

/// GitHub client using reqwest for the release endpoints of a single
/// repository and for raw asset downloads.
pub struct Github {
    config: RemoteConfig,
    base_url: Url,
    upload_base_url: Url,
    client: Client,
    download_client: Client,
}

impl Github {
    /// Create GitHub client with token authentication. Asset downloads use a
    /// separate client that sends no credentials and never follows
    /// redirects on its own.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let token = config.token.expose_secret();

        let mut headers = HeaderMap::new();

        let mut token_value =
            HeaderValue::from_str(format!("Bearer {}", token).as_str())?;
        token_value.set_sensitive(true);

        headers.append(AUTHORIZATION, token_value);
        headers.append(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.append(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let download_client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()?;

        let base_url = repo_base_url(&config.api_url, &config.path())?;
        let upload_base_url =
            repo_base_url(&config.upload_url, &config.path())?;

        Ok(Self {
            config,
            base_url,
            upload_base_url,
            client,
            download_client,
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn release_url(&self, release_id: u64) -> Result<Url> {
        Ok(self.base_url.join(&format!("releases/{release_id}"))?)
    }

    fn assets_url(&self, release_id: u64) -> Result<Url> {
        Ok(self.base_url.join(&format!("releases/{release_id}/assets"))?)
    }

    fn upload_asset_url(&self, release_id: u64, name: &str) -> Result<Url> {
        let mut url = self
            .upload_base_url
            .join(&format!("releases/{release_id}/assets"))?;
        url.query_pairs_mut().append_pair("name", name);
        Ok(url)
    }
}

/// Build `{base}/repos/{owner}/{repo}/` keeping any path prefix on the base
/// (e.g. `/api/v3` on Enterprise hosts).
fn repo_base_url(base: &Url, repo_path: &str) -> Result<Url> {
    let raw = format!(
        "{}/repos/{}/",
        base.as_str().trim_end_matches('/'),
        repo_path
    );
    Ok(Url::parse(&raw)?)
}

#[async_trait]
impl ReleaseApi for Github {
    async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release> {
        let url = self.base_url.join("releases")?;
        debug!("POST {url}: {req:?}");
        let request = self.client.post(url).json(&req).build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let release: Release = result.json().await?;
        Ok(release)
    }

    async fn get_release(&self, release_id: u64) -> Result<Release> {
        let url = self.release_url(release_id)?;
        debug!("GET {url}");
        let request = self.client.get(url).build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let release: Release = result.json().await?;
        Ok(release)
    }

    async fn update_release(
        &self,
        release_id: u64,
        req: UpdateReleaseRequest,
    ) -> Result<Release> {
        let url = self.release_url(release_id)?;
        debug!("PATCH {url}: {req:?}");
        let request = self.client.patch(url).json(&req).build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let release: Release = result.json().await?;
        Ok(release)
    }

    async fn list_release_assets(&self, release_id: u64) -> Result<Vec<Asset>> {
        let page_limit = ASSETS_PAGE_SIZE.to_string();
        let mut page = 1;
        let mut assets = vec![];

        loop {
            let mut url = self.assets_url(release_id)?;

            url.query_pairs_mut()
                .append_pair("per_page", &page_limit)
                .append_pair("page", &page.to_string());

            debug!("GET {url}");
            let request = self.client.get(url).build()?;
            let response = self.client.execute(request).await?;
            let result = response.error_for_status()?;
            let batch: Vec<Asset> = result.json().await?;
            let count = batch.len();

            assets.extend(batch);

            if count < ASSETS_PAGE_SIZE {
                break;
            }

            page += 1;
        }

        Ok(assets)
    }

    async fn upload_release_asset(
        &self,
        release_id: u64,
        name: &str,
        content: Vec<u8>,
    ) -> Result<Asset> {
        let url = self.upload_asset_url(release_id, name)?;
        debug!("POST {url}: {} bytes", content.len());
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, content.len())
            .body(content)
            .build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let asset: Asset = result.json().await?;
        Ok(asset)
    }
}

#[async_trait]
impl AssetFetcher for Github {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        debug!("GET {url}");
        let request = self.download_client.get(url.clone()).build()?;
        let response = self.download_client.execute(request).await?;
        let status = response.status();

        match status {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .ok_or_else(|| {
                        ReleaseHelperError::MissingRedirectLocation {
                            url: url.to_string(),
                        }
                    })?
                    .to_str()
                    .wrap_err("redirect location is not valid text")?
                    .to_string();

                Ok(FetchResponse::Redirect {
                    status: status.as_u16(),
                    location,
                })
            }
            StatusCode::OK => {
                let stream = response
                    .bytes_stream()
                    .map(|chunk| {
                        chunk.map(|bytes| bytes.to_vec()).map_err(Report::from)
                    })
                    .boxed();

                Ok(FetchResponse::Content(stream))
            }
            other => Ok(FetchResponse::Status(other.as_u16())),
        }
    }
}
