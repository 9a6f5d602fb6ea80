//! Configuration parameters for pitch contour extraction

use crate::features::salience::{SalienceFunctionConfig, SaliencePeaksConfig};
use crate::features::tracking::ContourTrackingConfig;

/// Pitch extraction configuration parameters
///
/// The defaults target a 44.1 kHz analysis with a 128-sample hop, which is
/// the cadence the contour continuity defaults were tuned for. When changing
/// `hop_size` or `sample_rate`, revisit `pitch_continuity`, `time_continuity`
/// and `min_duration` as well.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    // Frame cadence
    /// Sample rate of the analyzed audio in Hz (default: 44100.0)
    pub sample_rate: f32,

    /// Hop size between consecutive frames in samples (default: 128)
    pub hop_size: usize,

    // Salience function
    /// Salience bin resolution in cents (default: 10.0)
    pub bin_resolution: f32,

    /// Frequency of salience bin 0 in Hz (default: 55.0, note A1)
    pub reference_frequency: f32,

    /// Weight decay per harmonic index, in [0, 1] (default: 0.8)
    /// Harmonic h contributes with weight harmonic_weight^(h-1)
    pub harmonic_weight: f32,

    /// Magnitude compression exponent, in (0, 1] (default: 1.0 = no compression)
    pub magnitude_compression: f32,

    /// Minimum compressed magnitude for a peak to contribute (default: 0.0)
    pub magnitude_threshold: f32,

    /// Number of harmonics summed per peak (default: 20)
    pub number_harmonics: usize,

    // Salience peak picking
    /// Lowest frequency considered when picking salience peaks in Hz (default: 40.0)
    pub min_frequency: f32,

    /// Highest frequency considered when picking salience peaks in Hz (default: 1760.0)
    pub max_frequency: f32,

    /// Maximum number of salience peaks reported per frame (default: 100)
    pub max_peaks: usize,

    /// Refine peak positions by parabolic interpolation (default: false)
    /// When disabled, reported bins are integral
    pub interpolate: bool,

    // Contour tracking
    /// Fraction of the frame's maximum salience a peak must reach to be
    /// eligible for tracking, in [0, 1] (default: 0.9)
    pub peak_frame_threshold: f32,

    /// Relative salience tolerance for extending a contour (default: 0.9)
    pub peak_distribution_threshold: f32,

    /// Maximum pitch jump when extending a contour across one hop,
    /// in cents per second (default: 27562.5, about 80 cents per hop)
    pub pitch_continuity: f32,

    /// Maximum number of consecutive unmatched frames before a contour is
    /// finalized (default: 34.45, about 100 ms at the default cadence)
    pub time_continuity: f32,

    /// Minimum contour duration in seconds; shorter contours are discarded
    /// after finalization (default: 0.1)
    pub min_duration: f32,
}

impl ExtractionConfig {
    /// Salience function parameters for this configuration
    pub fn salience_config(&self) -> SalienceFunctionConfig {
        SalienceFunctionConfig {
            bin_resolution: self.bin_resolution,
            reference_frequency: self.reference_frequency,
            harmonic_weight: self.harmonic_weight,
            magnitude_compression: self.magnitude_compression,
            magnitude_threshold: self.magnitude_threshold,
            number_harmonics: self.number_harmonics,
        }
    }

    /// Salience peak picking parameters for this configuration
    pub fn peaks_config(&self) -> SaliencePeaksConfig {
        SaliencePeaksConfig {
            bin_resolution: self.bin_resolution,
            reference_frequency: self.reference_frequency,
            min_frequency: self.min_frequency,
            max_frequency: self.max_frequency,
            max_peaks: self.max_peaks,
            interpolate: self.interpolate,
        }
    }

    /// Contour tracking parameters for this configuration
    pub fn tracking_config(&self) -> ContourTrackingConfig {
        ContourTrackingConfig {
            bin_resolution: self.bin_resolution,
            hop_size: self.hop_size,
            sample_rate: self.sample_rate,
            peak_frame_threshold: self.peak_frame_threshold,
            peak_distribution_threshold: self.peak_distribution_threshold,
            pitch_continuity: self.pitch_continuity,
            time_continuity: self.time_continuity,
            min_duration: self.min_duration,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            hop_size: 128,
            bin_resolution: 10.0,
            reference_frequency: 55.0,
            harmonic_weight: 0.8,
            magnitude_compression: 1.0,
            magnitude_threshold: 0.0,
            number_harmonics: 20,
            min_frequency: 40.0,
            max_frequency: 1760.0,
            max_peaks: 100,
            interpolate: false,
            peak_frame_threshold: 0.9,
            peak_distribution_threshold: 0.9,
            pitch_continuity: 27562.5,
            time_continuity: 34.45,
            min_duration: 0.1,
        }
    }
}
