//! # Melos DSP
//!
//! A predominant-pitch extraction engine that turns per-frame spectral peaks
//! into continuous pitch contours.
//!
//! ## Features
//!
//! - **Salience Function**: Harmonic summation over a 5-octave pitch range
//!   with a raised-cosine spreading kernel
//! - **Peak Extraction**: Ranked local-maximum pitch candidates per frame,
//!   with optional parabolic refinement
//! - **Contour Tracking**: Cross-frame candidate linking under pitch,
//!   salience and duration continuity constraints
//!
//! ## Quick Start
//!
//! ```
//! use melos_dsp::{extract_pitch_contours, ExtractionConfig, SpectralPeak};
//!
//! // Per-frame spectral peaks from an external peak detector
//! let frames: Vec<Vec<SpectralPeak>> = (0..100)
//!     .map(|_| vec![SpectralPeak::new(220.0, 1.0)])
//!     .collect();
//!
//! let result = extract_pitch_contours(&frames, &ExtractionConfig::default())?;
//!
//! for contour in &result.contours {
//!     println!("contour at {:.3}s, {} frames", contour.start_time, contour.bins.len());
//! }
//! # Ok::<(), melos_dsp::ExtractionError>(())
//! ```
//!
//! ## Architecture
//!
//! The extraction pipeline follows this flow:
//!
//! ```text
//! Spectral Peaks → Salience Function → Salience Peaks → Contour Tracking → Output
//! ```
//!
//! The first two stages are pure per-frame functions and run in parallel
//! across frames; contour tracking consumes the per-frame candidates
//! strictly in time order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod units;

// Re-export main types
pub use analysis::result::{ExtractionMetadata, ExtractionResult};
pub use config::ExtractionConfig;
pub use error::ExtractionError;
pub use features::salience::{
    extract_salience_peaks, SalienceFunction, SalienceFunctionConfig, SaliencePeak,
    SaliencePeaksConfig, SpectralPeak,
};
pub use features::tracking::{ContourSet, ContourTracker, ContourTrackingConfig, PitchContour};

use rayon::prelude::*;

/// Algorithm version reported in extraction metadata
const ALGORITHM_VERSION: &str = "0.1.0";

/// Main extraction function
///
/// Runs the full pipeline over a sequence of per-frame spectral peak lists:
/// salience computation and peak extraction fan out across frames, then the
/// sequential contour tracker links the per-frame candidates into contours.
///
/// # Arguments
///
/// * `frames` - Per-frame spectral peaks, in frame order
/// * `config` - Extraction configuration parameters
///
/// # Returns
///
/// `ExtractionResult` containing the surviving contours and metadata. An
/// empty frame sequence is valid and yields an empty contour set.
///
/// # Errors
///
/// Returns `ExtractionError::InvalidConfig` for out-of-domain configuration
/// and `ExtractionError::InvalidInput` for malformed frames (negative
/// magnitudes, zero frequencies).
///
/// # Example
///
/// ```
/// use melos_dsp::{extract_pitch_contours, ExtractionConfig, SpectralPeak};
///
/// let frames = vec![vec![SpectralPeak::new(440.0, 1.0)]; 50];
/// let result = extract_pitch_contours(&frames, &ExtractionConfig::default())?;
/// # Ok::<(), melos_dsp::ExtractionError>(())
/// ```
pub fn extract_pitch_contours(
    frames: &[Vec<SpectralPeak>],
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractionError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting pitch extraction: {} frames, hop {} at {} Hz",
        frames.len(),
        config.hop_size,
        config.sample_rate
    );

    // Configuration is validated up front, before any frame is touched
    let salience_function = SalienceFunction::new(config.salience_config())?;
    let peaks_config = config.peaks_config();
    let tracker = ContourTracker::new(config.tracking_config())?;

    // Stateless per-frame stages fan out across frames; collect preserves
    // frame order for the sequential tracker
    let per_frame: Vec<(Vec<f32>, Vec<f32>)> = frames
        .par_iter()
        .map(|frame| -> Result<(Vec<f32>, Vec<f32>), ExtractionError> {
            let frequencies: Vec<f32> = frame.iter().map(|p| p.frequency).collect();
            let magnitudes: Vec<f32> = frame.iter().map(|p| p.magnitude).collect();

            let salience = salience_function.compute(&frequencies, &magnitudes)?;
            let peaks = extract_salience_peaks(&salience, &peaks_config)?;

            let bins: Vec<f32> = peaks.iter().map(|p| p.bin).collect();
            let saliences: Vec<f32> = peaks.iter().map(|p| p.salience).collect();
            Ok((bins, saliences))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (peak_bins, peak_saliences): (Vec<Vec<f32>>, Vec<Vec<f32>>) =
        per_frame.into_iter().unzip();

    let candidate_frames = peak_bins.iter().filter(|bins| !bins.is_empty()).count();
    log::debug!(
        "{} of {} frames produced salience peak candidates",
        candidate_frames,
        frames.len()
    );

    let contour_set = tracker.track(&peak_bins, &peak_saliences)?;

    let mut warnings = Vec::new();
    if !frames.is_empty() && candidate_frames == 0 {
        warnings.push("No salience peaks found in any frame".to_string());
    }
    if contour_set.contours.is_empty() && candidate_frames > 0 {
        warnings.push(format!(
            "No contour survived the {:.3} s minimum duration",
            config.min_duration
        ));
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!(
        "Extracted {} contours in {:.2} ms",
        contour_set.contours.len(),
        processing_time_ms
    );

    Ok(ExtractionResult {
        contours: contour_set.contours,
        metadata: ExtractionMetadata {
            duration_seconds: contour_set.duration,
            frame_count: frames.len(),
            sample_rate: config.sample_rate,
            hop_size: config.hop_size,
            processing_time_ms,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            warnings,
        },
    })
}
