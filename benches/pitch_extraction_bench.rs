//! Performance benchmarks for pitch contour extraction

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use melos_dsp::{
    extract_pitch_contours, extract_salience_peaks, ExtractionConfig, SalienceFunction,
    SpectralPeak,
};

/// Synthetic harmonic peak stacks for a slow melodic line
fn melody_frames(n_frames: usize) -> Vec<Vec<SpectralPeak>> {
    let fundamentals = [220.0f32, 246.94, 277.18, 293.66, 329.63];
    (0..n_frames)
        .map(|i| {
            let f = fundamentals[(i / 100) % fundamentals.len()];
            (1..=8)
                .map(|h| SpectralPeak::new(h as f32 * f, 1.0 / h as f32))
                .collect()
        })
        .collect()
}

fn bench_extract_pitch_contours(c: &mut Criterion) {
    // About 3 seconds of frames at the default 44.1 kHz / 128-sample cadence
    let frames = melody_frames(1000);
    let config = ExtractionConfig::default();

    c.bench_function("extract_pitch_contours_1000_frames", |b| {
        b.iter(|| {
            let _ = extract_pitch_contours(black_box(&frames), black_box(&config));
        });
    });
}

fn bench_salience_function(c: &mut Criterion) {
    let config = ExtractionConfig::default();
    let engine = SalienceFunction::new(config.salience_config()).unwrap();

    let frequencies: Vec<f32> = (1..=8).map(|h| h as f32 * 220.0).collect();
    let magnitudes: Vec<f32> = (1..=8).map(|h| 1.0 / h as f32).collect();

    c.bench_function("salience_function_single_frame", |b| {
        b.iter(|| {
            let _ = engine.compute(black_box(&frequencies), black_box(&magnitudes));
        });
    });
}

fn bench_salience_peaks(c: &mut Criterion) {
    let config = ExtractionConfig::default();
    let engine = SalienceFunction::new(config.salience_config()).unwrap();
    let peaks_config = config.peaks_config();

    let frequencies: Vec<f32> = (1..=8).map(|h| h as f32 * 220.0).collect();
    let magnitudes: Vec<f32> = (1..=8).map(|h| 1.0 / h as f32).collect();
    let salience = engine.compute(&frequencies, &magnitudes).unwrap();

    c.bench_function("salience_peaks_single_frame", |b| {
        b.iter(|| {
            let _ = extract_salience_peaks(black_box(&salience), black_box(&peaks_config));
        });
    });
}

criterion_group!(
    benches,
    bench_extract_pitch_contours,
    bench_salience_function,
    bench_salience_peaks
);
criterion_main!(benches);
