//! Contour tracking modules
//!
//! Links per-frame salience peaks into continuous pitch trajectories:
//! - Contour storage arena (id-indexed records with lifecycle state)
//! - Cross-frame tracking state machine

pub mod store;
pub mod tracker;

pub use store::{ContourRecord, ContourState, ContourStore};
pub use tracker::{ContourTracker, ContourTrackingConfig};

use serde::{Deserialize, Serialize};

/// One finalized pitch contour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchContour {
    /// Start time in seconds
    pub start_time: f32,

    /// Duration in seconds (frame count times hop time)
    pub duration: f32,

    /// Pitch bin per frame
    pub bins: Vec<f32>,

    /// Salience per frame, same length as `bins`
    pub saliences: Vec<f32>,
}

impl PitchContour {
    /// End time in seconds
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }

    /// Mean salience over the contour
    pub fn salience_mean(&self) -> f32 {
        self.saliences.iter().sum::<f32>() / self.saliences.len() as f32
    }

    /// Mean pitch bin over the contour
    pub fn bin_mean(&self) -> f32 {
        self.bins.iter().sum::<f32>() / self.bins.len() as f32
    }
}

/// The surviving contours of one analyzed segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourSet {
    /// Surviving contours in creation order
    pub contours: Vec<PitchContour>,

    /// Total analyzed duration in seconds, reported even when no contour
    /// survives
    pub duration: f32,
}
