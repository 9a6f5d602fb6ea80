//! Integration tests for the pitch extraction pipeline

use melos_dsp::{
    extract_pitch_contours, extract_salience_peaks, ContourTracker, ExtractionConfig,
    SalienceFunction, SpectralPeak,
};

const HOP_TIME: f32 = 128.0 / 44100.0;

/// Synthesize one frame with a harmonic peak stack at the given fundamental
fn harmonic_frame(fundamental: f32) -> Vec<SpectralPeak> {
    vec![
        SpectralPeak::new(fundamental, 1.0),
        SpectralPeak::new(2.0 * fundamental, 0.5),
        SpectralPeak::new(3.0 * fundamental, 0.33),
    ]
}

/// Frames for a sequence of notes, each held for `frames_per_note` frames
fn scale_frames(fundamentals: &[f32], frames_per_note: usize) -> Vec<Vec<SpectralPeak>> {
    fundamentals
        .iter()
        .flat_map(|&f| std::iter::repeat_with(move || harmonic_frame(f)).take(frames_per_note))
        .collect()
}

#[test]
fn test_rising_scale_produces_one_contour_per_note() {
    // Whole-tone steps (200 cents) exceed the per-hop continuity budget,
    // so each note must form its own contour
    let fundamentals = [220.0, 246.94, 277.18, 311.13];
    let frames_per_note = 50;
    let frames = scale_frames(&fundamentals, frames_per_note);

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert_eq!(result.contours.len(), fundamentals.len());

    for (i, contour) in result.contours.iter().enumerate() {
        assert_eq!(contour.bins.len(), frames_per_note);
        assert_eq!(contour.saliences.len(), frames_per_note);
        assert!(
            (contour.start_time - (i * frames_per_note) as f32 * HOP_TIME).abs() < 1e-4,
            "contour {} starts at {:.4}",
            i,
            contour.start_time
        );
        assert!((contour.duration - frames_per_note as f32 * HOP_TIME).abs() < 1e-4);
    }

    // Bin sequences rise monotonically with the fundamentals
    for pair in result.contours.windows(2) {
        assert!(
            pair[1].bin_mean() > pair[0].bin_mean(),
            "contours should rise with the scale"
        );
    }

    // 220 Hz is 2400 cents above the 55 Hz reference, bin 240 at defaults
    assert!((result.contours[0].bin_mean() - 240.0).abs() < 1.5);
}

#[test]
fn test_parallel_pipeline_matches_sequential() {
    let fundamentals = [220.0, 246.94, 277.18];
    let frames = scale_frames(&fundamentals, 40);
    let config = ExtractionConfig::default();

    let parallel = extract_pitch_contours(&frames, &config).expect("Extraction should succeed");

    // Hand-rolled sequential path through the same stages
    let engine = SalienceFunction::new(config.salience_config()).unwrap();
    let peaks_config = config.peaks_config();
    let tracker = ContourTracker::new(config.tracking_config()).unwrap();

    let mut peak_bins = Vec::new();
    let mut peak_saliences = Vec::new();
    for frame in &frames {
        let frequencies: Vec<f32> = frame.iter().map(|p| p.frequency).collect();
        let magnitudes: Vec<f32> = frame.iter().map(|p| p.magnitude).collect();
        let salience = engine.compute(&frequencies, &magnitudes).unwrap();
        let peaks = extract_salience_peaks(&salience, &peaks_config).unwrap();
        peak_bins.push(peaks.iter().map(|p| p.bin).collect::<Vec<f32>>());
        peak_saliences.push(peaks.iter().map(|p| p.salience).collect::<Vec<f32>>());
    }
    let sequential = tracker.track(&peak_bins, &peak_saliences).unwrap();

    assert_eq!(parallel.contours.len(), sequential.contours.len());
    for (a, b) in parallel.contours.iter().zip(sequential.contours.iter()) {
        assert_eq!(a.bins, b.bins);
        assert_eq!(a.saliences, b.saliences);
        assert_eq!(a.start_time, b.start_time);
    }
}

#[test]
fn test_vibrato_stays_in_one_contour() {
    // Slow +/-30 cent vibrato moves a few cents per hop, well within the
    // continuity budget
    let n_frames = 80;
    let frames: Vec<Vec<SpectralPeak>> = (0..n_frames)
        .map(|i| {
            let cents = 30.0 * (2.0 * std::f32::consts::PI * i as f32 / 40.0).sin();
            let f = 220.0 * (cents / 1200.0).exp2();
            harmonic_frame(f)
        })
        .collect();

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert_eq!(result.contours.len(), 1);
    let contour = &result.contours[0];
    assert_eq!(contour.bins.len(), n_frames);

    let min_bin = contour.bins.iter().copied().fold(f32::INFINITY, f32::min);
    let max_bin = contour.bins.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert!(max_bin - min_bin >= 4.0, "vibrato should modulate the bins");
}

#[test]
fn test_empty_frame_sequence() {
    let result = extract_pitch_contours(&[], &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert!(result.contours.is_empty());
    assert_eq!(result.metadata.frame_count, 0);
    assert_eq!(result.metadata.duration_seconds, 0.0);
}

#[test]
fn test_peakless_frames_yield_empty_set_with_duration() {
    let frames: Vec<Vec<SpectralPeak>> = vec![vec![]; 50];

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert!(result.contours.is_empty());
    assert!((result.metadata.duration_seconds - 50.0 * HOP_TIME).abs() < 1e-4);
    assert!(!result.metadata.warnings.is_empty());
}

#[test]
fn test_sub_reference_peaks_yield_no_contours() {
    // 50 Hz sits below the 55 Hz reference, so no bin ever lights up
    let frames: Vec<Vec<SpectralPeak>> = vec![vec![SpectralPeak::new(50.0, 1.0)]; 60];

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert!(result.contours.is_empty());
    assert!((result.metadata.duration_seconds - 60.0 * HOP_TIME).abs() < 1e-4);
}

#[test]
fn test_short_note_is_discarded() {
    // 20 frames is 58 ms, under the 100 ms minimum duration
    let frames = scale_frames(&[220.0], 20);

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert!(result.contours.is_empty());
    assert!(!result.metadata.warnings.is_empty());
}

#[test]
fn test_invalid_configuration_fails_before_processing() {
    let frames = scale_frames(&[220.0], 10);
    let config = ExtractionConfig {
        harmonic_weight: 2.0,
        ..Default::default()
    };

    let result = extract_pitch_contours(&frames, &config);
    assert!(matches!(
        result,
        Err(melos_dsp::ExtractionError::InvalidConfig(_))
    ));
}

#[test]
fn test_zero_frequency_peak_fails_extraction() {
    let mut frames = scale_frames(&[220.0], 10);
    frames[5].push(SpectralPeak::new(0.0, 1.0));

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default());
    assert!(matches!(
        result,
        Err(melos_dsp::ExtractionError::InvalidInput(_))
    ));
}

#[test]
fn test_metadata_reflects_input() {
    let frames = scale_frames(&[220.0, 277.18], 40);

    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    assert_eq!(result.metadata.frame_count, 80);
    assert_eq!(result.metadata.sample_rate, 44100.0);
    assert_eq!(result.metadata.hop_size, 128);
    assert!((result.metadata.duration_seconds - 80.0 * HOP_TIME).abs() < 1e-4);
    assert!(!result.metadata.algorithm_version.is_empty());
}

#[test]
fn test_result_serializes_to_json() {
    let frames = scale_frames(&[220.0], 50);
    let result = extract_pitch_contours(&frames, &ExtractionConfig::default())
        .expect("Extraction should succeed");

    let json = serde_json::to_string(&result).expect("Result should serialize");
    assert!(json.contains("contours"));
    assert!(json.contains("algorithm_version"));
}
