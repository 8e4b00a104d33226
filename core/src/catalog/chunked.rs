// storefront/src/catalog/chunked.rs

//! Paced and endlessly repeating variants of the base listing.

use super::reader::{CatalogReader, CatalogStream};
use crate::error::CatalogResult;
use crate::model::Product;
use crate::store::{DocumentStream, StoreError};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use std::mem;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Products grouped for partial rendering, at most `batch_size` per item.
pub type BatchStream = BoxStream<'static, CatalogResult<Vec<Product>>>;

#[derive(Clone)]
pub struct ChunkedStreamer {
  reader: CatalogReader,
}

impl ChunkedStreamer {
  pub fn new(reader: CatalogReader) -> Self {
    Self { reader }
  }

  /// The base listing with a `delay` sleep in front of every product.
  ///
  /// Values and order are untouched. Errors are passed on without waiting.
  /// Dropping the stream cancels a pending sleep along with the query.
  pub fn read_paced(&self, delay: Duration) -> CatalogStream {
    self
      .reader
      .read_all()
      .then(move |item| async move {
        if item.is_ok() {
          tokio::time::sleep(delay).await;
        }
        item
      })
      .boxed()
  }

  /// [`read_paced`](Self::read_paced) flushed in groups of `batch_size`.
  ///
  /// The final group may be shorter. If the listing fails mid-group, the
  /// products already received are flushed before the error.
  pub fn read_paced_batches(&self, delay: Duration, batch_size: NonZeroUsize) -> BatchStream {
    self
      .read_paced(delay)
      .chunks(batch_size.get())
      .flat_map(|items| stream::iter(split_batch(items)))
      .boxed()
  }

  /// The base listing replayed from the start forever.
  ///
  /// The store is queried once per call; later cycles replay what the first
  /// pass returned, so they do not see writes made in the meantime. An empty
  /// first pass ends the stream. The consumer decides when to stop reading.
  pub fn read_repeating(&self) -> CatalogStream {
    self.reader.shape(replay_forever(self.reader.source()))
  }
}

fn split_batch(items: Vec<CatalogResult<Product>>) -> Vec<CatalogResult<Vec<Product>>> {
  let mut flushed = Vec::new();
  let mut pending = Vec::with_capacity(items.len());
  for item in items {
    match item {
      Ok(product) => pending.push(product),
      Err(e) => {
        if !pending.is_empty() {
          flushed.push(Ok(mem::take(&mut pending)));
        }
        flushed.push(Err(e));
      }
    }
  }
  if !pending.is_empty() {
    flushed.push(Ok(pending));
  }
  flushed
}

enum Replay {
  /// First pass: forward store results and remember them.
  Priming {
    source: DocumentStream<Product>,
    seen: Vec<Product>,
  },
  Cycling {
    cache: Arc<[Product]>,
    cursor: usize,
  },
  Done,
}

/// Produces on demand; never materialises more than one cycle.
fn replay_forever(source: DocumentStream<Product>) -> impl Stream<Item = Result<Product, StoreError>> + Send {
  let initial = Replay::Priming {
    source,
    seen: Vec::new(),
  };
  stream::unfold(initial, |state| async move {
    match state {
      Replay::Priming { mut source, mut seen } => match source.next().await {
        Some(Ok(product)) => {
          seen.push(product.clone());
          Some((Ok(product), Replay::Priming { source, seen }))
        }
        Some(Err(e)) => Some((Err(e), Replay::Done)),
        None if seen.is_empty() => None,
        None => {
          let cache: Arc<[Product]> = seen.into();
          let first = cache[0].clone();
          Some((Ok(first), Replay::Cycling { cache, cursor: 1 }))
        }
      },
      Replay::Cycling { cache, cursor } => {
        let idx = cursor % cache.len();
        let product = cache[idx].clone();
        Some((Ok(product), Replay::Cycling { cache, cursor: idx + 1 }))
      }
      Replay::Done => None,
    }
  })
}
