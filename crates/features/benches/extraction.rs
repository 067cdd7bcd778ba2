//! Benchmarks for feature extraction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxelomics_core::{Geometry, Volume};
use voxelomics_features::{ExtractionConfig, FeatureClass, FeatureExtractor};

/// Synthetic volume with a centered spherical ROI of varied intensities
fn create_test_pair(size: usize) -> (Volume<f64>, Volume<u32>) {
    let mut image: Volume<f64> = Volume::new(size, size, size);
    image.set_geometry(Geometry::new([0.0; 3], [1.0, 1.0, 1.0]));
    let mut mask: Volume<u32> = Volume::new(size, size, size);
    mask.set_geometry(*image.geometry());

    let center = size as f64 / 2.0;
    let radius = size as f64 / 3.0;
    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                let v = ((i * 7 + j * 13 + k * 3) % 256) as f64;
                image.set(i, j, k, v).unwrap();

                let d = ((i as f64 - center).powi(2)
                    + (j as f64 - center).powi(2)
                    + (k as f64 - center).powi(2))
                .sqrt();
                if d <= radius {
                    mask.set(i, j, k, 1).unwrap();
                }
            }
        }
    }
    (image, mask)
}

fn bench_full_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction/full");
    for size in [16, 32, 64] {
        let (image, mask) = create_test_pair(size);
        let extractor = FeatureExtractor::with_defaults();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| extractor.execute(black_box(&image), black_box(&mask)).unwrap())
        });
    }
    group.finish();
}

fn bench_texture_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction/glcm");
    for size in [16, 32, 64] {
        let (image, mask) = create_test_pair(size);
        let extractor = FeatureExtractor::new(ExtractionConfig {
            classes: vec![FeatureClass::Glcm],
            ..Default::default()
        })
        .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| extractor.execute(black_box(&image), black_box(&mask)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_extraction, bench_texture_only);
criterion_main!(benches);
