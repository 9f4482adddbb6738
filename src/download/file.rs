//! Streaming file content to disk.

use std::fmt::Display;
use std::path::Path;

use futures::{Stream, StreamExt};
use indicatif::ProgressBar;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Stream a response body into `output_path`, replacing any existing file.
pub async fn save_response(response: Response, output_path: &Path, show_progress: bool) -> Result<u64> {
    let content_length = response.content_length();
    let show_progress = show_progress && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false);

    let progress = show_progress.then(|| create_download_bar(content_length.unwrap_or(0)));

    write_stream(response.bytes_stream(), output_path, progress).await
}

/// Write chunks into a temporary sibling of `output_path` and move it into
/// place once the stream has ended cleanly.
///
/// An existing file at `output_path` is untouched until the whole body has
/// arrived; on failure the partial temporary file is removed.
pub async fn write_stream<S, B, E>(
    stream: S,
    output_path: &Path,
    progress: Option<ProgressBar>,
) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let parent = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut builder = tempfile::Builder::new();
    builder.prefix(".synapse-").suffix(".part");
    // Temporary files default to owner-only access.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let partial = builder.tempfile_in(parent)?;
    let (std_file, partial_path) = partial.into_parts();
    let mut file = File::from_std(std_file);
    let mut downloaded: u64 = 0;
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        let chunk = chunk.as_ref();
        file.write_all(chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(ref pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    partial_path.persist(output_path).map_err(|e| Error::Io(e.error))?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    tracing::debug!("Wrote {} bytes to {}", downloaded, output_path.display());

    Ok(downloaded)
}
