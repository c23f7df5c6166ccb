//! [`ObstacleMap`] – per-angle detection storage for one sweep arc.
//!
//! The map is keyed by the fixed step sequence of scan angles.  All keys are
//! created at construction and the key set never changes afterwards; only the
//! `Option<Detection>` value per key mutates as the sweep revisits each
//! angle.

use std::collections::BTreeMap;

use sonarscope_types::Detection;
use tracing::warn;

/// Mapping from scan angle (whole degrees) to the most recent detection at
/// that angle, `None` when nothing was detected on the last pass.
///
/// The sweep controller is the sole writer; readers only ever see cloned
/// copies inside published snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleMap {
    cells: BTreeMap<u16, Option<Detection>>,
}

impl ObstacleMap {
    /// Create a map with one empty cell for every multiple of `step_deg`
    /// within `[min_deg, max_deg]`.
    pub fn new(min_deg: u16, max_deg: u16, step_deg: u16) -> Self {
        let cells = (min_deg..=max_deg)
            .step_by(step_deg as usize)
            .map(|angle| (angle, None))
            .collect();
        Self { cells }
    }

    /// Record the classification outcome for `angle_deg`.
    ///
    /// Angles outside the fixed step sequence are rejected: the key set is
    /// immutable after construction.
    pub fn record(&mut self, angle_deg: u16, detection: Option<Detection>) {
        match self.cells.get_mut(&angle_deg) {
            Some(cell) => *cell = detection,
            None => warn!(angle_deg, "ignoring record for angle outside the scan sequence"),
        }
    }

    /// Return the detection stored at `angle_deg`, or `None` when the angle
    /// is not part of the scan sequence.
    pub fn get(&self, angle_deg: u16) -> Option<&Option<Detection>> {
        self.cells.get(&angle_deg)
    }

    /// Number of cells (one per scan angle).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when the map has no cells (degenerate configuration).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Borrow the underlying cells, in ascending angle order.
    pub fn cells(&self) -> &BTreeMap<u16, Option<Detection>> {
        &self.cells
    }
}
