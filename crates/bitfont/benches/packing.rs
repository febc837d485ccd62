//! Benchmarks for glyph packing and kerning

use std::sync::Arc;

use bitfont::{DynamicFont, DynamicFontConfig, FontStyle};
use bitfont_test_utils::{MockMetrics, MockSurfacePool, MockTextureProvider};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn ascii() -> String {
    (' '..='~').collect()
}

fn create_font(config: DynamicFontConfig) -> DynamicFont {
    let mut metrics = MockMetrics::new(55.0, 72.0);
    for (i, ch) in ('A'..='Z').enumerate() {
        metrics = metrics.with_advance(ch, 50.0 + (i % 7) as f32 * 4.0);
    }
    let metrics = metrics.with_pair('A', 'V', -8.0).with_pair('T', 'o', -6.0);

    DynamicFont::builder(FontStyle::new("Inter").size(32.0))
        .config(config)
        .metrics(Arc::new(metrics))
        .surface_pool(Arc::new(MockSurfacePool::new()))
        .textures(Arc::new(MockTextureProvider::new()))
        .build()
        .unwrap()
}

fn bench_pack_ascii(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_ascii");
    let text = ascii();
    group.throughput(Throughput::Elements(text.chars().count() as u64));

    for texture_size in [128u32, 256, 512] {
        let config = DynamicFontConfig::default()
            .with_texture_size(texture_size)
            .with_skip_kerning(true);
        group.bench_with_input(
            BenchmarkId::from_parameter(texture_size),
            &config,
            |b, config| {
                b.iter_batched(
                    || create_font(config.clone()),
                    |mut font| {
                        font.ensure_characters(black_box(&text)).unwrap();
                        font
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_kerning(c: &mut Criterion) {
    let mut group = c.benchmark_group("kerning");

    for count in [16usize, 48, 95] {
        let text: String = ascii().chars().take(count).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter_batched(
                || create_font(DynamicFontConfig::default()),
                |mut font| {
                    font.ensure_characters(black_box(text)).unwrap();
                    font
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    c.bench_function("incremental_single_char", |b| {
        b.iter_batched(
            || {
                let mut font = create_font(DynamicFontConfig::default());
                font.ensure_characters("the quick brown fox jumps over the lazy dog")
                    .unwrap();
                font
            },
            |mut font| {
                font.ensure_characters(black_box("Q")).unwrap();
                font
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_resident(c: &mut Criterion) {
    let mut font = create_font(DynamicFontConfig::default());
    let text = ascii();
    font.ensure_characters(&text).unwrap();

    c.bench_function("ensure_resident", |b| {
        b.iter(|| font.ensure_characters(black_box(&text)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_pack_ascii,
    bench_kerning,
    bench_incremental,
    bench_resident
);
criterion_main!(benches);
