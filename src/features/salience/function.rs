//! Harmonic pitch salience function
//!
//! Converts per-frame spectral peaks into a dense salience function over a
//! 5-octave pitch range, using harmonic summation with a raised-cosine
//! spreading kernel.
//!
//! # Algorithm
//!
//! 1. Compress each peak magnitude: `m^magnitude_compression`
//! 2. For each harmonic h = 1..=number_harmonics, map `frequency / h` to its
//!    nearest salience bin
//! 3. Spread the contribution over neighboring bins with a raised-cosine
//!    kernel of half-width one semitone, scaled by `harmonic_weight^(h-1)`
//! 4. Accumulate contributions from all peaks and harmonics additively
//!
//! Peaks below the reference frequency fall outside the bin range and
//! contribute nothing.
//!
//! # Example
//!
//! ```
//! use melos_dsp::features::salience::function::{SalienceFunction, SalienceFunctionConfig};
//!
//! let engine = SalienceFunction::new(SalienceFunctionConfig::default())?;
//! let salience = engine.compute(&[220.0, 440.0], &[1.0, 0.5])?;
//! assert_eq!(salience.len(), 600);
//! # Ok::<(), melos_dsp::ExtractionError>(())
//! ```

use crate::error::ExtractionError;
use crate::units::{bin_count, CENTS_PER_OCTAVE, CENTS_PER_SEMITONE};
use std::f32::consts::FRAC_PI_2;

/// Salience function configuration
#[derive(Debug, Clone)]
pub struct SalienceFunctionConfig {
    /// Bin resolution in cents (default: 10.0)
    pub bin_resolution: f32,

    /// Frequency of bin 0 in Hz (default: 55.0)
    pub reference_frequency: f32,

    /// Harmonic weight decay factor, in [0, 1] (default: 0.8)
    pub harmonic_weight: f32,

    /// Magnitude compression exponent, in (0, 1] (default: 1.0)
    pub magnitude_compression: f32,

    /// Minimum compressed magnitude for a peak to contribute (default: 0.0)
    pub magnitude_threshold: f32,

    /// Number of harmonics to sum per peak (default: 20)
    pub number_harmonics: usize,
}

impl Default for SalienceFunctionConfig {
    fn default() -> Self {
        Self {
            bin_resolution: 10.0,
            reference_frequency: 55.0,
            harmonic_weight: 0.8,
            magnitude_compression: 1.0,
            magnitude_threshold: 0.0,
            number_harmonics: 20,
        }
    }
}

/// Harmonic salience function engine
///
/// Validates its configuration at construction and precomputes the bin
/// layout and per-harmonic weights, so `compute` is a pure per-frame
/// function safe to run on many frames in parallel.
#[derive(Debug, Clone)]
pub struct SalienceFunction {
    config: SalienceFunctionConfig,
    num_bins: usize,
    bins_in_octave: f32,
    // Kernel half-width in bins, clamped to at least 1 so coarse resolutions
    // (> 100 cents per bin) keep a valid kernel instead of dividing by zero
    bins_in_semitone: usize,
    harmonic_weights: Vec<f32>,
}

impl SalienceFunction {
    /// Create a salience function engine
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidConfig` if any parameter violates
    /// its domain (see `SalienceFunctionConfig` field docs).
    pub fn new(config: SalienceFunctionConfig) -> Result<Self, ExtractionError> {
        if config.bin_resolution <= 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid bin resolution: {:.2} (must be > 0)",
                config.bin_resolution
            )));
        }

        if !(0.0..=1.0).contains(&config.harmonic_weight) {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid harmonic weight: {:.2} (must be in [0, 1])",
                config.harmonic_weight
            )));
        }

        if config.magnitude_compression <= 0.0 || config.magnitude_compression > 1.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid magnitude compression: {:.2} (must be in (0, 1])",
                config.magnitude_compression
            )));
        }

        if config.magnitude_threshold < 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid magnitude threshold: {:.2} (must be >= 0)",
                config.magnitude_threshold
            )));
        }

        if config.number_harmonics == 0 {
            return Err(ExtractionError::InvalidConfig(
                "Invalid number of harmonics: 0 (must be >= 1)".to_string(),
            ));
        }

        if config.reference_frequency <= 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid reference frequency: {:.2} (must be > 0)",
                config.reference_frequency
            )));
        }

        let num_bins = bin_count(config.bin_resolution);
        let bins_in_octave = CENTS_PER_OCTAVE / config.bin_resolution;
        let bins_in_semitone =
            ((CENTS_PER_SEMITONE / config.bin_resolution).floor() as usize).max(1);

        let harmonic_weights: Vec<f32> = (0..config.number_harmonics)
            .map(|h| config.harmonic_weight.powi(h as i32))
            .collect();

        Ok(Self {
            config,
            num_bins,
            bins_in_octave,
            bins_in_semitone,
            harmonic_weights,
        })
    }

    /// Length of the salience arrays produced by this engine
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Compute the salience function for one frame of spectral peaks
    ///
    /// # Arguments
    ///
    /// * `frequencies` - Peak frequencies in Hz
    /// * `magnitudes` - Peak magnitudes (same length as `frequencies`)
    ///
    /// # Returns
    ///
    /// Salience array of fixed length `num_bins()`. Empty peak input yields
    /// an all-zero array.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidInput` if the input slices differ in
    /// length, any magnitude is negative, or any frequency is exactly zero.
    pub fn compute(
        &self,
        frequencies: &[f32],
        magnitudes: &[f32],
    ) -> Result<Vec<f32>, ExtractionError> {
        if frequencies.len() != magnitudes.len() {
            return Err(ExtractionError::InvalidInput(format!(
                "Frequency/magnitude length mismatch: {} vs {}",
                frequencies.len(),
                magnitudes.len()
            )));
        }

        let mut salience = vec![0.0f32; self.num_bins];
        let mut skipped_below_reference = 0usize;

        for (&frequency, &magnitude) in frequencies.iter().zip(magnitudes.iter()) {
            if magnitude < 0.0 {
                return Err(ExtractionError::InvalidInput(format!(
                    "Negative peak magnitude: {:.4}",
                    magnitude
                )));
            }

            if frequency == 0.0 {
                return Err(ExtractionError::InvalidInput(
                    "Peak frequency of exactly zero".to_string(),
                ));
            }

            if frequency < self.config.reference_frequency {
                // Negative frequencies are treated the same way: no bin to land in
                skipped_below_reference += 1;
                continue;
            }

            let compressed = magnitude.powf(self.config.magnitude_compression);
            if compressed < self.config.magnitude_threshold {
                continue;
            }

            self.accumulate_peak(&mut salience, frequency, compressed);
        }

        if skipped_below_reference > 0 {
            log::debug!(
                "Skipped {} of {} peaks below reference frequency {:.1} Hz",
                skipped_below_reference,
                frequencies.len(),
                self.config.reference_frequency
            );
        }

        Ok(salience)
    }

    /// Add one peak's harmonic series into the salience array
    fn accumulate_peak(&self, salience: &mut [f32], frequency: f32, compressed_magnitude: f32) {
        let half_width = self.bins_in_semitone as i32;

        for (h, &weight) in self.harmonic_weights.iter().enumerate() {
            let harmonic_frequency = frequency / (h + 1) as f32;
            if harmonic_frequency < self.config.reference_frequency {
                // Subharmonics only get lower from here
                break;
            }

            let center = (self.bins_in_octave
                * (harmonic_frequency / self.config.reference_frequency).log2()
                + 0.5)
                .floor() as i32;

            let first = (center - half_width).max(0);
            let last = (center + half_width).min(self.num_bins as i32 - 1);

            for bin in first..=last {
                let distance = (bin - center).abs() as f32 / half_width as f32;
                let kernel = (distance * FRAC_PI_2).cos().powi(2);
                salience[bin as usize] += compressed_magnitude * weight * kernel;
            }
        }
    }
}
