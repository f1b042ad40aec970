#[path = "../tests/common/mod.rs"]
mod common;

use common::{hello_world_grid, render_frame};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pixelqr::{DecodeOptions, decode, decode_matrix};

fn bench_full_pipeline(c: &mut Criterion) {
    let (pixels, width, height) = render_frame(&hello_world_grid(), 8, 16);
    let options = DecodeOptions::default();
    c.bench_function("decode_rendered_v1", |b| {
        b.iter(|| {
            decode(
                black_box(&pixels),
                black_box(width),
                black_box(height),
                black_box(&options),
            )
        })
    });
}

fn bench_full_pipeline_blank(c: &mut Criterion) {
    // Worst case for the attempt loop: nothing to find, every grid tried.
    let pixels = vec![255u8; 640 * 480 * 4];
    let options = DecodeOptions::default();
    c.bench_function("decode_blank_640x480", |b| {
        b.iter(|| {
            decode(
                black_box(&pixels),
                black_box(640),
                black_box(480),
                black_box(&options),
            )
        })
    });
}

fn bench_matrix_decode(c: &mut Criterion) {
    let grid = hello_world_grid();
    c.bench_function("decode_matrix_v1", |b| {
        b.iter(|| {
            let mut scratch = grid.clone();
            decode_matrix(black_box(&mut scratch))
        })
    });
}

criterion_group!(
    benches,
    bench_full_pipeline,
    bench_full_pipeline_blank,
    bench_matrix_decode
);
criterion_main!(benches);
