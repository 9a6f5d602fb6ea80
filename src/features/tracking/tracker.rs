//! Cross-frame pitch contour tracking
//!
//! Consumes per-frame salience peak lists in strict time order and links
//! them into contours under continuity, salience and duration constraints.
//!
//! # Algorithm
//!
//! Per frame:
//!
//! 1. Keep only peaks within `peak_frame_threshold` of the frame maximum
//! 2. Match surviving peaks against active contours: a peak may extend a
//!    contour when its bin is within the per-hop pitch continuity budget of
//!    the contour's last bin and its salience is within the distribution
//!    tolerance of the contour's running mean; best combined deviation wins,
//!    one peak per contour and one contour per peak
//! 3. Unmatched peaks start new contours
//! 4. Contours unmatched for more than `time_continuity` frames are
//!    finalized
//!
//! After the last frame all remaining contours are finalized, and contours
//! shorter than `min_duration` are discarded.
//!
//! The tracker is inherently sequential: it carries the active contour set
//! across frames and must consume them in order.

use super::store::ContourStore;
use super::{ContourSet, PitchContour};
use crate::error::ExtractionError;

const EPSILON: f32 = 1e-10;

/// Contour tracking configuration
#[derive(Debug, Clone)]
pub struct ContourTrackingConfig {
    /// Bin resolution in cents (default: 10.0)
    pub bin_resolution: f32,

    /// Hop size between frames in samples (default: 128)
    pub hop_size: usize,

    /// Sample rate in Hz (default: 44100.0)
    pub sample_rate: f32,

    /// Fraction of the frame maximum a peak must reach, in [0, 1]
    /// (default: 0.9)
    pub peak_frame_threshold: f32,

    /// Relative salience tolerance for contour continuation (default: 0.9)
    pub peak_distribution_threshold: f32,

    /// Maximum pitch jump across one hop in cents per second
    /// (default: 27562.5)
    pub pitch_continuity: f32,

    /// Maximum consecutive unmatched frames before finalization
    /// (default: 34.45)
    pub time_continuity: f32,

    /// Minimum surviving contour duration in seconds (default: 0.1)
    pub min_duration: f32,
}

impl Default for ContourTrackingConfig {
    fn default() -> Self {
        Self {
            bin_resolution: 10.0,
            hop_size: 128,
            sample_rate: 44100.0,
            peak_frame_threshold: 0.9,
            peak_distribution_threshold: 0.9,
            pitch_continuity: 27562.5,
            time_continuity: 34.45,
            min_duration: 0.1,
        }
    }
}

/// Cross-frame contour tracking state machine
#[derive(Debug, Clone)]
pub struct ContourTracker {
    config: ContourTrackingConfig,
    hop_time: f32,
    max_jump_bins: f32,
}

impl ContourTracker {
    /// Create a contour tracker
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidConfig` if any parameter violates
    /// its domain (see `ContourTrackingConfig` field docs).
    pub fn new(config: ContourTrackingConfig) -> Result<Self, ExtractionError> {
        if config.bin_resolution <= 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid bin resolution: {:.2} (must be > 0)",
                config.bin_resolution
            )));
        }

        if config.hop_size == 0 {
            return Err(ExtractionError::InvalidConfig(
                "Invalid hop size: 0 (must be >= 1)".to_string(),
            ));
        }

        if config.sample_rate <= 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid sample rate: {:.1} (must be > 0)",
                config.sample_rate
            )));
        }

        if !(0.0..=1.0).contains(&config.peak_frame_threshold) {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid peak frame threshold: {:.2} (must be in [0, 1])",
                config.peak_frame_threshold
            )));
        }

        if config.peak_distribution_threshold < 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid peak distribution threshold: {:.2} (must be >= 0)",
                config.peak_distribution_threshold
            )));
        }

        if config.pitch_continuity < 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid pitch continuity: {:.2} (must be >= 0)",
                config.pitch_continuity
            )));
        }

        if config.time_continuity < 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid time continuity: {:.2} (must be >= 0)",
                config.time_continuity
            )));
        }

        if config.min_duration < 0.0 {
            return Err(ExtractionError::InvalidConfig(format!(
                "Invalid minimum duration: {:.2} (must be >= 0)",
                config.min_duration
            )));
        }

        let hop_time = config.hop_size as f32 / config.sample_rate;
        let max_jump_bins = config.pitch_continuity * hop_time / config.bin_resolution;

        Ok(Self {
            config,
            hop_time,
            max_jump_bins,
        })
    }

    /// Time between consecutive frames in seconds
    pub fn hop_time(&self) -> f32 {
        self.hop_time
    }

    /// Link per-frame salience peaks into pitch contours
    ///
    /// # Arguments
    ///
    /// * `peak_bins` - Per-frame peak bin positions, in frame order
    /// * `peak_saliences` - Per-frame peak saliences, matching `peak_bins`
    ///
    /// # Returns
    ///
    /// The surviving contours plus the total analyzed duration. An empty
    /// frame sequence yields an empty contour set with zero duration.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidInput` if the outer sequences differ
    /// in length or any frame's bin/salience lists differ in length.
    pub fn track(
        &self,
        peak_bins: &[Vec<f32>],
        peak_saliences: &[Vec<f32>],
    ) -> Result<ContourSet, ExtractionError> {
        if peak_bins.len() != peak_saliences.len() {
            return Err(ExtractionError::InvalidInput(format!(
                "Frame count mismatch: {} bin frames vs {} salience frames",
                peak_bins.len(),
                peak_saliences.len()
            )));
        }

        for (frame, (bins, saliences)) in peak_bins.iter().zip(peak_saliences.iter()).enumerate() {
            if bins.len() != saliences.len() {
                return Err(ExtractionError::InvalidInput(format!(
                    "Bin/salience length mismatch in frame {}: {} vs {}",
                    frame,
                    bins.len(),
                    saliences.len()
                )));
            }
        }

        let n_frames = peak_bins.len();
        log::debug!(
            "Tracking contours over {} frames (hop {:.4} s, jump budget {:.2} bins)",
            n_frames,
            self.hop_time,
            self.max_jump_bins
        );

        let mut store = ContourStore::new();

        for frame in 0..n_frames {
            let filtered = self.filter_frame_peaks(&peak_bins[frame], &peak_saliences[frame]);
            self.advance_frame(&mut store, frame, &filtered);
        }

        store.finalize_all();
        let created = store.len();
        store.discard_shorter_than(self.config.min_duration / self.hop_time);

        let contours: Vec<PitchContour> = store
            .finalized()
            .map(|record| PitchContour {
                start_time: record.start_frame as f32 * self.hop_time,
                duration: record.len() as f32 * self.hop_time,
                bins: record.bins.clone(),
                saliences: record.saliences.clone(),
            })
            .collect();

        log::debug!(
            "Tracked {} contours, {} survive the {:.3} s minimum duration",
            created,
            contours.len(),
            self.config.min_duration
        );

        Ok(ContourSet {
            contours,
            duration: n_frames as f32 * self.hop_time,
        })
    }

    /// Keep only peaks within the frame threshold of the frame maximum
    fn filter_frame_peaks(&self, bins: &[f32], saliences: &[f32]) -> Vec<(f32, f32)> {
        let frame_max = saliences.iter().copied().fold(0.0f32, f32::max);
        let threshold = self.config.peak_frame_threshold * frame_max;

        bins.iter()
            .zip(saliences.iter())
            .filter(|(_, &salience)| salience >= threshold)
            .map(|(&bin, &salience)| (bin, salience))
            .collect()
    }

    /// Run one frame of the state machine: match, spawn, age out
    fn advance_frame(&self, store: &mut ContourStore, frame: usize, peaks: &[(f32, f32)]) {
        let snapshot: Vec<usize> = store.active_ids().to_vec();

        // Rank all admissible (contour, peak) pairs by combined deviation.
        // The sort is stable, so equal costs resolve to the earlier contour.
        let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
        for &id in &snapshot {
            let record = store.record(id);
            let last_bin = record.last_bin();
            let mean = record.salience_mean();

            for (peak_idx, &(bin, salience)) in peaks.iter().enumerate() {
                let pitch_dev = (bin - last_bin).abs();
                if pitch_dev > self.max_jump_bins {
                    continue;
                }

                let salience_dev = (salience - mean).abs();
                if salience_dev > self.config.peak_distribution_threshold * mean {
                    continue;
                }

                let cost = pitch_dev / self.max_jump_bins.max(EPSILON)
                    + salience_dev / (mean + EPSILON);
                candidates.push((cost, id, peak_idx));
            }
        }
        candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut matched_ids: Vec<usize> = Vec::new();
        let mut peak_consumed = vec![false; peaks.len()];

        for (_, id, peak_idx) in candidates {
            if peak_consumed[peak_idx] || matched_ids.contains(&id) {
                continue;
            }
            let (bin, salience) = peaks[peak_idx];
            extend_with_gap_fill(store, id, bin, salience);
            matched_ids.push(id);
            peak_consumed[peak_idx] = true;
        }

        // Leftover peaks seed new contours
        for (peak_idx, &(bin, salience)) in peaks.iter().enumerate() {
            if !peak_consumed[peak_idx] {
                store.spawn(frame, bin, salience);
            }
        }

        // Age out contours that went unmatched this frame
        for id in snapshot {
            if matched_ids.contains(&id) {
                continue;
            }
            let record = store.record_mut(id);
            record.gap_frames += 1;
            if record.gap_frames as f32 > self.config.time_continuity {
                store.finalize(id);
            }
        }
    }
}

/// Extend a contour, linearly interpolating across any unmatched gap so its
/// bin/salience history stays contiguous
fn extend_with_gap_fill(store: &mut ContourStore, id: usize, bin: f32, salience: f32) {
    let record = store.record_mut(id);
    let gap = record.gap_frames;

    if gap > 0 {
        let from_bin = record.last_bin();
        let from_salience = record.last_salience();
        let steps = (gap + 1) as f32;
        for i in 1..=gap {
            let t = i as f32 / steps;
            record.push(
                from_bin + t * (bin - from_bin),
                from_salience + t * (salience - from_salience),
            );
        }
        record.gap_frames = 0;
    }

    record.push(bin, salience);
}
