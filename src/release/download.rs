//! Redirect-following asset download streamed to disk
use color_eyre::eyre::WrapErr;
use futures_util::StreamExt;
use log::*;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use url::Url;

use crate::{
    Result,
    error::ReleaseHelperError,
    forge::{
        traits::AssetFetcher,
        types::{ByteStream, FetchResponse},
    },
};

/// Maximum number of requests made for one asset, counting the first.
pub const MAX_REDIRECT_HOPS: usize = 3;

/// Download `url` into `dest`, following 301/302 responses. Returns the
/// number of bytes written.
pub async fn download_asset(
    fetcher: &dyn AssetFetcher,
    url: &str,
    dest: &Path,
) -> Result<u64> {
    let stream = fetch_following_redirects(fetcher, url).await?;
    stream_to_file(stream, dest).await
}

/// Resolve `url` to a content stream, giving up after
/// [`MAX_REDIRECT_HOPS`] requests.
pub async fn fetch_following_redirects(
    fetcher: &dyn AssetFetcher,
    url: &str,
) -> Result<ByteStream> {
    let mut current = Url::parse(url)
        .wrap_err_with(|| format!("invalid download url: {url}"))?;

    for hop in 1..=MAX_REDIRECT_HOPS {
        match fetcher.fetch(&current).await? {
            FetchResponse::Redirect { status, location } => {
                debug!("hop {hop}: {status} from {current} to {location}");
                // Location may be relative to the url that sent it
                current = current.join(&location).wrap_err_with(|| {
                    format!("invalid redirect location: {location}")
                })?;
            }
            FetchResponse::Content(stream) => return Ok(stream),
            FetchResponse::Status(status) => {
                return Err(
                    ReleaseHelperError::bad_status(current, status).into()
                );
            }
        }
    }

    Err(ReleaseHelperError::TooManyRedirects {
        url: url.to_string(),
        limit: MAX_REDIRECT_HOPS,
    }
    .into())
}

/// Write the stream to a hidden `.part` file beside `dest` and move it into
/// place once every chunk has been written. The partial file is removed on
/// failure.
pub async fn stream_to_file(stream: ByteStream, dest: &Path) -> Result<u64> {
    let part = part_path(dest)?;

    match commit_part(stream, &part, dest).await {
        Ok(written) => Ok(written),
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&part).await {
                debug!("failed to remove {}: {cleanup}", part.display());
            }
            Err(err)
        }
    }
}

async fn commit_part(
    stream: ByteStream,
    part: &Path,
    dest: &Path,
) -> Result<u64> {
    let written = write_part(stream, part).await?;

    fs::rename(part, dest).await.wrap_err_with(|| {
        format!("failed to move download into {}", dest.display())
    })?;

    Ok(written)
}

async fn write_part(mut stream: ByteStream, part: &Path) -> Result<u64> {
    let mut file = fs::File::create(part)
        .await
        .wrap_err_with(|| format!("failed to create {}", part.display()))?;

    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.wrap_err("error reading download stream")?;
        file.write_all(&chunk)
            .await
            .wrap_err_with(|| format!("failed to write {}", part.display()))?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(written)
}

fn part_path(dest: &Path) -> Result<PathBuf> {
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ReleaseHelperError::InvalidAssetName(dest.display().to_string())
        })?;

    Ok(dest.with_file_name(format!(".{file_name}.part")))
}
