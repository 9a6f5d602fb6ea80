//! Contour storage arena
//!
//! Contours are created, extended and retired every frame, so they live in a
//! flat id-indexed arena with a separate active-id list for cheap per-frame
//! iteration. Records keep running salience statistics so the tracker can
//! test continuation candidates without rescanning history.

/// Lifecycle state of a contour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourState {
    /// Still eligible for extension
    Active,

    /// Closed; bin/salience history is immutable from here on
    Finalized,

    /// Finalized but shorter than the minimum duration; excluded from output
    Discarded,
}

/// One contour's accumulated state
#[derive(Debug, Clone)]
pub struct ContourRecord {
    /// Frame index of the first candidate in this contour
    pub start_frame: usize,

    /// Bin history, one entry per frame since `start_frame`
    pub bins: Vec<f32>,

    /// Salience history, same length as `bins`
    pub saliences: Vec<f32>,

    /// Lifecycle state
    pub state: ContourState,

    /// Consecutive frames without a matching candidate
    pub gap_frames: usize,

    salience_sum: f32,
}

impl ContourRecord {
    fn new(start_frame: usize, bin: f32, salience: f32) -> Self {
        Self {
            start_frame,
            bins: vec![bin],
            saliences: vec![salience],
            state: ContourState::Active,
            gap_frames: 0,
            salience_sum: salience,
        }
    }

    /// Number of frames recorded so far
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when no frames are recorded (never the case for spawned contours)
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Most recent bin position
    pub fn last_bin(&self) -> f32 {
        self.bins[self.bins.len() - 1]
    }

    /// Most recent salience value
    pub fn last_salience(&self) -> f32 {
        self.saliences[self.saliences.len() - 1]
    }

    /// Running mean of the recorded salience values
    pub fn salience_mean(&self) -> f32 {
        self.salience_sum / self.bins.len() as f32
    }

    /// Append one frame of bin/salience history
    pub fn push(&mut self, bin: f32, salience: f32) {
        self.bins.push(bin);
        self.saliences.push(salience);
        self.salience_sum += salience;
    }
}

/// Arena of contour records with an active-id index
#[derive(Debug, Default)]
pub struct ContourStore {
    records: Vec<ContourRecord>,
    active: Vec<usize>,
}

impl ContourStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Active contour and return its id
    pub fn spawn(&mut self, start_frame: usize, bin: f32, salience: f32) -> usize {
        let id = self.records.len();
        self.records.push(ContourRecord::new(start_frame, bin, salience));
        self.active.push(id);
        id
    }

    /// Ids of all Active contours, in creation order
    pub fn active_ids(&self) -> &[usize] {
        &self.active
    }

    /// Shared access to a record
    pub fn record(&self, id: usize) -> &ContourRecord {
        &self.records[id]
    }

    /// Mutable access to a record
    pub fn record_mut(&mut self, id: usize) -> &mut ContourRecord {
        &mut self.records[id]
    }

    /// Transition one Active contour to Finalized
    pub fn finalize(&mut self, id: usize) {
        self.records[id].state = ContourState::Finalized;
        self.active.retain(|&a| a != id);
    }

    /// Finalize every remaining Active contour (end of input)
    pub fn finalize_all(&mut self) {
        for &id in &self.active {
            self.records[id].state = ContourState::Finalized;
        }
        self.active.clear();
    }

    /// Discard Finalized contours shorter than `min_frames` frames
    pub fn discard_shorter_than(&mut self, min_frames: f32) {
        for record in &mut self.records {
            if record.state == ContourState::Finalized && (record.len() as f32) < min_frames {
                record.state = ContourState::Discarded;
            }
        }
    }

    /// Surviving (Finalized, not Discarded) contours in creation order
    pub fn finalized(&self) -> impl Iterator<Item = &ContourRecord> {
        self.records
            .iter()
            .filter(|r| r.state == ContourState::Finalized)
    }

    /// Total number of contours ever created
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no contours have been created
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
