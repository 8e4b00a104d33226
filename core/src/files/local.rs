// storefront/src/files/local.rs

use super::{ByteSource, FileStore};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::io;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{event, Level};

/// Writes uploads to the local filesystem, creating parent directories as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

#[async_trait]
impl FileStore for LocalFileStore {
  async fn write(&self, path: &Path, source: ByteSource) -> io::Result<()> {
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    match copy_chunks(path, source).await {
      Ok(written) => {
        event!(Level::DEBUG, path = %path.display(), bytes = written, "Upload written.");
        Ok(())
      }
      Err(e) => {
        // Half-written photos are never left behind.
        let _ = tokio::fs::remove_file(path).await;
        Err(e)
      }
    }
  }
}

async fn copy_chunks(path: &Path, source: ByteSource) -> io::Result<usize> {
  let mut file = tokio::fs::File::create(path).await?;
  let mut chunks = source.into_stream();
  let mut written = 0usize;
  while let Some(chunk) = chunks.next().await {
    let chunk = chunk?;
    file.write_all(&chunk).await?;
    written += chunk.len();
  }
  file.flush().await?;
  Ok(written)
}
