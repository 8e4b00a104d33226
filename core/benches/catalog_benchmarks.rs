use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures_util::stream::{StreamExt, TryStreamExt};
use std::sync::Arc;
use storefront::{
  ByteSource, CatalogService, Category, FileStore, MemoryCatalogStore, Observer, Product, ProductStore, UploadDir,
  UploadedFile,
};
use tokio::runtime::Runtime;

// --- Fixtures ---
/// Discards uploads; the benchmarks measure the pipeline, not the disk.
struct NullFileStore;

#[async_trait::async_trait]
impl FileStore for NullFileStore {
  async fn write(&self, _path: &std::path::Path, source: ByteSource) -> std::io::Result<()> {
    let mut chunks = source.into_stream();
    while let Some(chunk) = chunks.next().await {
      criterion::black_box(chunk?);
    }
    Ok(())
  }
}

fn quiet_observer() -> Observer {
  Arc::new(|product: &Product| {
    criterion::black_box(product.name.len());
  })
}

fn seeded_service(rt: &Runtime, products: usize) -> (CatalogService, MemoryCatalogStore) {
  let store = MemoryCatalogStore::with_categories([Category::new("cat-bench", "Bench")]);
  rt.block_on(async {
    for i in 0..products {
      let mut product = Product::draft(format!("product {i}"), i as f64);
      product.category = Some(Category::new("cat-bench", "Bench"));
      ProductStore::save(&store, product).await.unwrap();
    }
  });
  let service = CatalogService::new(
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    Arc::new(NullFileStore),
    UploadDir::new("/tmp/bench-uploads"),
  )
  .with_observer(quiet_observer());
  (service, store)
}

// --- Benchmark Functions ---

fn bench_list_all(c: &mut Criterion) {
  let mut group = c.benchmark_group("ListAll");
  let rt = Runtime::new().unwrap();

  for size in [10usize, 100, 1_000].iter() {
    let (service, _store) = seeded_service(&rt, *size);
    group.throughput(Throughput::Elements(*size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
      b.to_async(&rt).iter(|| {
        let listing = service.list_all();
        async move { listing.try_collect::<Vec<_>>().await.unwrap() }
      });
    });
  }
  group.finish();
}

fn bench_repeating_cycles(c: &mut Criterion) {
  let mut group = c.benchmark_group("RepeatingListing");
  let rt = Runtime::new().unwrap();
  let (service, _store) = seeded_service(&rt, 10);

  for taken in [10usize, 100, 1_000].iter() {
    group.throughput(Throughput::Elements(*taken as u64));
    group.bench_with_input(BenchmarkId::new("take", taken), taken, |b, &taken| {
      b.to_async(&rt).iter(|| {
        let listing = service.list_repeating();
        async move { listing.take(taken).try_collect::<Vec<_>>().await.unwrap() }
      });
    });
  }
  group.finish();
}

fn bench_save_pipeline(c: &mut Criterion) {
  let mut group = c.benchmark_group("SavePipeline");
  let rt = Runtime::new().unwrap();
  let (service, _store) = seeded_service(&rt, 0);

  group.throughput(Throughput::Elements(1));
  group.bench_function("without_upload", |b| {
    b.to_async(&rt).iter_batched(
      || Product::draft("Bench chair", 42.0),
      |candidate| {
        let service = service.clone();
        async move { service.submit(candidate, "cat-bench", None).await.unwrap() }
      },
      criterion::BatchSize::SmallInput,
    );
  });
  group.bench_function("with_upload", |b| {
    b.to_async(&rt).iter_batched(
      || {
        let upload = UploadedFile::new("bench photo.jpg", ByteSource::from_bytes(vec![0u8; 4096]));
        (Product::draft("Bench chair", 42.0), upload)
      },
      |(candidate, upload)| {
        let service = service.clone();
        async move { service.submit(candidate, "cat-bench", Some(upload)).await.unwrap() }
      },
      criterion::BatchSize::SmallInput,
    );
  });
  group.finish();
}

fn bench_context_data_access(c: &mut Criterion) {
  let mut group = c.benchmark_group("ContextDataAccess");
  let ctx = storefront::ContextData::new(Product::draft("Lamp", 10.0));

  group.bench_function("read_lock", |b| {
    b.iter(|| {
      let guard = ctx.read();
      criterion::black_box(guard.price);
    })
  });

  group.bench_function("write_lock_and_modify", |b| {
    b.iter(|| {
      let mut guard = ctx.write();
      guard.price += 1.0;
      criterion::black_box(guard.price);
    })
  });
  group.finish();
}

criterion_group!(
  benches,
  bench_list_all,
  bench_repeating_cycles,
  bench_save_pipeline,
  bench_context_data_access
);
criterion_main!(benches);
