//! Extraction result types

use crate::features::tracking::PitchContour;
use serde::{Deserialize, Serialize};

/// Complete pitch extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Surviving pitch contours in creation order
    pub contours: Vec<PitchContour>,

    /// Extraction metadata
    pub metadata: ExtractionMetadata,
}

/// Extraction metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Analyzed duration in seconds (frame count times hop time)
    pub duration_seconds: f32,

    /// Number of analyzed frames
    pub frame_count: usize,

    /// Sample rate in Hz
    pub sample_rate: f32,

    /// Hop size in samples
    pub hop_size: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Warnings raised during extraction (sparse candidates, empty frames, etc.)
    pub warnings: Vec<String>,
}
