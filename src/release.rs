//! Release operations run by the command-line commands.
//!
//! Every operation is a sequence of awaited calls: no two remote calls or
//! file transfers are in flight at once, and the batch operations stop at the
//! first failure, leaving already transferred assets in place.
use color_eyre::eyre::WrapErr;
use log::*;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    Result,
    error::ReleaseHelperError,
    forge::{
        traits::{AssetFetcher, ReleaseApi},
        types::{CreateReleaseRequest, Release, UpdateReleaseRequest},
    },
};

pub mod download;

/// Parse a release id argument.
pub fn parse_release_id(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ReleaseHelperError::InvalidReleaseId(value.into()).into())
}

/// Reduce a ref-like string to its last path segment:
/// `refs/tags/v1.0` becomes `v1.0`.
pub fn normalize_tag(tag_ref: &str) -> Result<&str> {
    let tag = tag_ref.rsplit('/').next().unwrap_or(tag_ref).trim();

    if tag.is_empty() {
        return Err(ReleaseHelperError::InvalidTagName(tag_ref.into()).into());
    }

    Ok(tag)
}

/// Create a draft release named after the tag and return its id.
pub async fn draft_release(api: &dyn ReleaseApi, tag_ref: &str) -> Result<u64> {
    let tag = normalize_tag(tag_ref)?;

    let release = api
        .create_release(CreateReleaseRequest {
            tag_name: tag.to_string(),
            name: tag.to_string(),
            draft: true,
        })
        .await
        .wrap_err_with(|| format!("failed to create release for {tag}"))?;

    info!("created draft release {} for tag {tag}", release.id);

    Ok(release.id)
}

/// Upload a single file as a release asset named after its base name.
pub async fn upload_asset(
    api: &dyn ReleaseApi,
    release_id: u64,
    asset_path: &Path,
) -> Result<()> {
    let name = asset_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ReleaseHelperError::InvalidAssetName(
                asset_path.display().to_string(),
            )
        })?;

    let data = fs::read(asset_path)
        .await
        .wrap_err_with(|| format!("failed to read {}", asset_path.display()))?;

    let size = data.len();

    api.upload_release_asset(release_id, name, data)
        .await
        .wrap_err_with(|| format!("failed to upload asset {name}"))?;

    info!("uploaded {name} ({size} bytes) to release {release_id}");

    Ok(())
}

/// Upload every file directly inside `folder_path`, in file-name order.
/// Sub-directories are skipped with a warning rather than failing the
/// batch; any other failure stops the remaining uploads.
pub async fn upload_all_assets(
    api: &dyn ReleaseApi,
    release_id: u64,
    folder_path: &Path,
) -> Result<()> {
    let entries = list_folder(folder_path).await?;

    for path in entries {
        let metadata = fs::metadata(&path)
            .await
            .wrap_err_with(|| format!("failed to stat {}", path.display()))?;

        if metadata.is_dir() {
            warn!("skipping directory {}", path.display());
            continue;
        }

        upload_asset(api, release_id, &path).await?;
    }

    Ok(())
}

async fn list_folder(folder_path: &Path) -> Result<Vec<PathBuf>> {
    let mut read_dir = fs::read_dir(folder_path).await.wrap_err_with(|| {
        format!("failed to list {}", folder_path.display())
    })?;

    let mut entries = vec![];

    while let Some(entry) = read_dir.next_entry().await? {
        entries.push(entry.path());
    }

    entries.sort();

    Ok(entries)
}

/// Download every asset of a release into `output_path`, creating the
/// directory if needed. Files are named after the assets.
pub async fn download_all_assets(
    api: &dyn ReleaseApi,
    fetcher: &dyn AssetFetcher,
    release_id: u64,
    output_path: &Path,
) -> Result<()> {
    if fs::metadata(output_path).await.is_err() {
        debug!("creating output directory {}", output_path.display());
        fs::create_dir_all(output_path).await.wrap_err_with(|| {
            format!("failed to create {}", output_path.display())
        })?;
    }

    let assets = api
        .list_release_assets(release_id)
        .await
        .wrap_err_with(|| {
            format!("failed to list assets of release {release_id}")
        })?;

    for asset in assets {
        if Path::new(&asset.name).file_name()
            != Some(std::ffi::OsStr::new(&asset.name))
        {
            return Err(ReleaseHelperError::InvalidAssetName(asset.name).into());
        }

        let dest = output_path.join(&asset.name);

        info!("Fetching {} to {}", asset.browser_download_url, dest.display());

        let written =
            download::download_asset(fetcher, &asset.browser_download_url, &dest)
                .await
                .wrap_err_with(|| {
                    format!("failed to download asset {}", asset.name)
                })?;

        debug!("wrote {written} bytes to {}", dest.display());
    }

    Ok(())
}

/// Mark a draft release as published.
pub async fn publish_release(api: &dyn ReleaseApi, release_id: u64) -> Result<()> {
    api.update_release(
        release_id,
        UpdateReleaseRequest {
            draft: Some(false),
            ..Default::default()
        },
    )
    .await
    .wrap_err_with(|| format!("failed to publish release {release_id}"))?;

    info!("published release {release_id}");

    Ok(())
}

/// Replace the release notes. The current tag name is sent back with the
/// body; GitHub otherwise detaches the release from its tag and creates an
/// `untagged-*` one.
pub async fn update_release_body(
    api: &dyn ReleaseApi,
    release_id: u64,
    body: &str,
) -> Result<()> {
    let release = get_release(api, release_id).await?;

    api.update_release(
        release_id,
        UpdateReleaseRequest {
            tag_name: Some(release.tag_name),
            body: Some(body.to_string()),
            ..Default::default()
        },
    )
    .await
    .wrap_err_with(|| format!("failed to update body of release {release_id}"))?;

    info!("updated body of release {release_id}");

    Ok(())
}

/// Fetch the full release resource.
pub async fn get_release(api: &dyn ReleaseApi, release_id: u64) -> Result<Release> {
    api.get_release(release_id)
        .await
        .wrap_err_with(|| format!("failed to get release {release_id}"))
}
