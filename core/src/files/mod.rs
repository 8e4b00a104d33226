// storefront/src/files/mod.rs

//! Uploaded photos: naming, the upload directory and the file-store collaborator.

pub mod local;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

pub use local::LocalFileStore;

/// The bytes of an upload, delivered as a stream of chunks.
pub struct ByteSource(BoxStream<'static, io::Result<Vec<u8>>>);

impl ByteSource {
  pub fn from_stream(chunks: impl futures_util::Stream<Item = io::Result<Vec<u8>>> + Send + 'static) -> Self {
    ByteSource(chunks.boxed())
  }

  pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
    ByteSource(stream::once(futures_util::future::ready(Ok(bytes.into()))).boxed())
  }

  pub fn into_stream(self) -> BoxStream<'static, io::Result<Vec<u8>>> {
    self.0
  }
}

impl fmt::Debug for ByteSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ByteSource(..)")
  }
}

/// A file part submitted along with the product form.
#[derive(Debug)]
pub struct UploadedFile {
  /// Name as sent by the client. Empty when the form's file input was left blank.
  pub filename: String,
  pub content: ByteSource,
}

impl UploadedFile {
  pub fn new(filename: impl Into<String>, content: ByteSource) -> Self {
    Self {
      filename: filename.into(),
      content,
    }
  }

  /// Final path component of the client's file name, `None` when there is
  /// no usable one (empty, `..`, a bare directory).
  pub fn base_name(&self) -> Option<&str> {
    Path::new(&self.filename).file_name().and_then(|name| name.to_str())
  }

  pub fn has_filename(&self) -> bool {
    self.base_name().is_some()
  }
}

/// Persists uploaded bytes somewhere durable.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
  async fn write(&self, path: &Path, source: ByteSource) -> io::Result<()>;
}

/// Replaces spaces, colons and backslashes with underscores.
pub fn sanitize_filename(original: &str) -> String {
  original
    .chars()
    .map(|c| match c {
      ' ' | ':' | '\\' => '_',
      other => other,
    })
    .collect()
}

/// `<random uuid>-<sanitized original name>`; unique per call.
///
/// Only the final path component of `original` is kept, so the result is
/// always a single file name inside the upload directory.
pub fn unique_photo_name(original: &str) -> String {
  let base = Path::new(original)
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or_default();
  format!("{}-{}", Uuid::new_v4(), sanitize_filename(base))
}

/// The directory that holds every product photo, one file per photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDir(PathBuf);

impl UploadDir {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    UploadDir(path.into())
  }

  pub fn path(&self) -> &Path {
    &self.0
  }

  /// Destination of a stored photo. `photo_name` comes from [`unique_photo_name`].
  pub fn photo_path(&self, photo_name: &str) -> PathBuf {
    self.0.join(photo_name)
  }

  /// Like [`photo_path`](Self::photo_path) but for names received from outside:
  /// anything that is not a single plain path component is refused.
  pub fn resolve(&self, photo_name: &str) -> Option<PathBuf> {
    if photo_name.is_empty() || photo_name.contains(['/', '\\']) {
      return None;
    }
    let mut components = Path::new(photo_name).components();
    match (components.next(), components.next()) {
      (Some(Component::Normal(_)), None) => Some(self.photo_path(photo_name)),
      _ => None,
    }
  }
}
