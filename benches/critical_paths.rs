//! Criterion benchmarks for Collager critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Color: RGB/HSL conversion
//! - Filters: Recomputing a layer's display grid
//! - Flatten: Compositing a project's layer stack
//! - Format: Project file encoding and decoding

use collager::color::{hsl_to_rgb, rgb_to_hsl};
use collager::format::{parse_project, write_project};
use collager::{Filter, Layer, Pixel, Project};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a size x size grid with a color gradient and varying alpha
fn make_grid(size: usize) -> Vec<Vec<Pixel>> {
    (0..size)
        .map(|row| {
            (0..size)
                .map(|col| {
                    let r = ((row * 7) % 256) as u16;
                    let g = ((col * 13) % 256) as u16;
                    let b = (((row + col) * 3) % 256) as u16;
                    let a = (128 + (row * col) % 128) as u16;
                    Pixel::rgb(r, g, b, a).expect("channels stay within 255")
                })
                .collect()
        })
        .collect()
}

/// Create a project with `depth` stamped layers above its background
fn make_project(size: usize, depth: usize) -> Project {
    let mut project = Project::new("bench", size, size).expect("valid project");
    let grid = make_grid(size);
    for i in 0..depth {
        let name = format!("layer_{}", i);
        project.add_layer(&name).expect("unique layer name");
        project.add_layer_img(&name, &grid, 0, 0).expect("grid fits the project");
        project.set_layer_filter(Filter::ALL[i % Filter::ALL.len()], &name).expect("layer exists");
    }
    project
}

// =============================================================================
// Color Conversion Benchmarks
// =============================================================================

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("rgb_to_hsl", |b| b.iter(|| rgb_to_hsl(black_box(200), black_box(40), black_box(90), 255, 255)));

    group.bench_function("hsl_to_rgb", |b| b.iter(|| hsl_to_rgb(black_box(327.5), black_box(0.66), black_box(0.47), 255, 255)));

    group.finish();
}

// =============================================================================
// Filter Benchmarks
// =============================================================================

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    for size in [16, 64, 256].iter() {
        let layer = Layer::new("bench", make_grid(*size), *size, *size).expect("valid layer");
        group.throughput(Throughput::Elements((*size * *size) as u64));

        for filter in [Filter::DarkenLuma, Filter::Difference, Filter::Screen] {
            group.bench_with_input(BenchmarkId::new(filter.as_str(), size), &layer, |b, layer| {
                b.iter(|| {
                    let mut layer = layer.clone();
                    layer.apply_filter(black_box(filter));
                    layer
                })
            });
        }
    }

    group.finish();
}

// =============================================================================
// Flatten Benchmarks
// =============================================================================

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for (size, depth) in [(64, 2), (64, 8), (256, 4)].iter() {
        let project = make_project(*size, *depth);
        let name = format!("compress_{}x{}x{}", size, size, depth);

        group.throughput(Throughput::Elements((*size * *size * *depth) as u64));
        group.bench_function(&name, |b| {
            b.iter(|| {
                let mut project = project.clone();
                project.compress_to_image("flat").map(|flat| flat.into_owned())
            })
        });
    }

    group.finish();
}

// =============================================================================
// Project File Benchmarks
// =============================================================================

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    let project = make_project(64, 4);
    let text = write_project(&project);

    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("write_project_64x64x4", |b| b.iter(|| write_project(black_box(&project))));
    group.bench_function("parse_project_64x64x4", |b| b.iter(|| parse_project(black_box(&text))));

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_color, bench_filters, bench_flatten, bench_format);

criterion_main!(benches);
