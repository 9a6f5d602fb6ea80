//! Salience peak extraction
//!
//! Scans a salience array for strict local maxima inside a configurable
//! frequency range, optionally refines them by parabolic interpolation, and
//! reports them ranked by salience. The result feeds contour tracking or
//! direct per-frame pitch estimation.

use crate::error::ExtractionError;
use crate::units::frequency_to_bin;

/// A local maximum of the salience function
#[derive(Debug, Clone, PartialEq)]
pub struct SaliencePeak {
    /// Bin position; fractional when interpolation is enabled
    pub bin: f32,

    /// Salience at the peak
    pub salience: f32,
}

/// Salience peak extraction configuration
#[derive(Debug, Clone)]
pub struct SaliencePeaksConfig {
    /// Bin resolution in cents (default: 10.0)
    pub bin_resolution: f32,

    /// Frequency of bin 0 in Hz (default: 55.0)
    pub reference_frequency: f32,

    /// Lowest frequency considered in Hz (default: 40.0)
    pub min_frequency: f32,

    /// Highest frequency considered in Hz (default: 1760.0)
    pub max_frequency: f32,

    /// Maximum number of peaks reported (default: 100)
    pub max_peaks: usize,

    /// Refine peak positions by parabolic interpolation (default: false)
    pub interpolate: bool,
}

impl Default for SaliencePeaksConfig {
    fn default() -> Self {
        Self {
            bin_resolution: 10.0,
            reference_frequency: 55.0,
            min_frequency: 40.0,
            max_frequency: 1760.0,
            max_peaks: 100,
            interpolate: false,
        }
    }
}

/// Extract ranked salience peaks from one salience array
///
/// Detects strict interior local maxima (both neighbors smaller) within the
/// configured frequency range, most salient first, truncated to
/// `max_peaks`. Array edges are never peaks, so monotonic or all-zero input
/// yields an empty list.
///
/// # Errors
///
/// Returns `ExtractionError::InvalidConfig` if the configuration violates
/// its domain (non-positive resolution or frequencies, inverted frequency
/// range, zero peak cap).
pub fn extract_salience_peaks(
    salience: &[f32],
    config: &SaliencePeaksConfig,
) -> Result<Vec<SaliencePeak>, ExtractionError> {
    if config.bin_resolution <= 0.0 {
        return Err(ExtractionError::InvalidConfig(format!(
            "Invalid bin resolution: {:.2} (must be > 0)",
            config.bin_resolution
        )));
    }

    if config.reference_frequency <= 0.0 {
        return Err(ExtractionError::InvalidConfig(format!(
            "Invalid reference frequency: {:.2} (must be > 0)",
            config.reference_frequency
        )));
    }

    if config.min_frequency <= 0.0 || config.max_frequency <= config.min_frequency {
        return Err(ExtractionError::InvalidConfig(format!(
            "Invalid frequency range: [{:.1}, {:.1}] Hz",
            config.min_frequency, config.max_frequency
        )));
    }

    if config.max_peaks == 0 {
        return Err(ExtractionError::InvalidConfig(
            "Invalid peak cap: 0 (must be >= 1)".to_string(),
        ));
    }

    if salience.len() < 3 {
        // Need at least 3 points for an interior maximum
        return Ok(vec![]);
    }

    let min_bin = frequency_to_bin(
        config.min_frequency,
        config.reference_frequency,
        config.bin_resolution,
    )
    .max(1) as usize;
    let max_bin = frequency_to_bin(
        config.max_frequency,
        config.reference_frequency,
        config.bin_resolution,
    )
    .min(salience.len() as i32 - 2);

    if max_bin < min_bin as i32 {
        return Ok(vec![]);
    }

    let mut peaks = Vec::new();

    for i in min_bin..=(max_bin as usize) {
        let value = salience[i];
        if value > 0.0 && value > salience[i - 1] && value > salience[i + 1] {
            let peak = if config.interpolate {
                refine_parabolic(salience, i)
            } else {
                SaliencePeak {
                    bin: i as f32,
                    salience: value,
                }
            };
            peaks.push(peak);
        }
    }

    peaks.sort_by(|a, b| {
        b.salience
            .partial_cmp(&a.salience)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.bin.partial_cmp(&b.bin).unwrap_or(std::cmp::Ordering::Equal))
    });
    peaks.truncate(config.max_peaks);

    log::debug!(
        "Extracted {} salience peaks in bins [{}, {}]",
        peaks.len(),
        min_bin,
        max_bin
    );

    Ok(peaks)
}

/// Refine a local maximum by fitting a parabola through it and its neighbors
///
/// The denominator cannot vanish at a strict maximum (both neighbors are
/// smaller), so the fit is always defined.
fn refine_parabolic(salience: &[f32], index: usize) -> SaliencePeak {
    let left = salience[index - 1];
    let center = salience[index];
    let right = salience[index + 1];

    let delta = 0.5 * (left - right) / (left - 2.0 * center + right);
    let refined = center - 0.25 * (left - right) * delta;

    SaliencePeak {
        bin: index as f32 + delta,
        salience: refined,
    }
}
