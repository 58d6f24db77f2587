//! HTTP utilities for downloading source archives.

use crate::bundler::error::{Error, ErrorExt, Result};
use futures_lite::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Downloads `url` to `dest`, streaming the body straight to disk.
///
/// Parent directories of `dest` are created as needed. A non-success status
/// or an empty body is an [`Error::Acquisition`].
///
/// Returns the number of bytes written.
pub async fn download(url: &str, user_agent: &str, dest: &Path) -> Result<u64> {
    log::info!("Downloading {}", url);

    let acquisition = |reason: String| Error::Acquisition {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| acquisition(format!("building HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| acquisition(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(acquisition(format!("HTTP {status}")));
    }

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    let file = tokio::fs::File::create(dest)
        .await
        .fs_context("creating archive", dest)?;
    let mut writer = tokio::io::BufWriter::new(file);
    let mut stream = std::pin::pin!(response.bytes_stream());
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| acquisition(format!("reading response body: {e}")))?;
        writer
            .write_all(&chunk)
            .await
            .fs_context("writing archive", dest)?;
        written += chunk.len() as u64;
    }

    writer.flush().await.fs_context("flushing archive", dest)?;

    if written == 0 {
        return Err(acquisition("response has no body".to_string()));
    }

    log::debug!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}
