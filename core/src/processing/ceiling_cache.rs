use crate::prelude::VesselId;
use crate::race_interface::Fix;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Identity of the fix sequence a ceiling was computed from.
pub fn track_fingerprint(fixes: &[Fix]) -> u64 {
    let mut hasher = DefaultHasher::new();
    fixes.len().hash(&mut hasher);
    for fix in fixes {
        fix.timestamp.hash(&mut hasher);
        fix.latitude.to_bits().hash(&mut hasher);
        fix.longitude.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[derive(Debug, Clone, Copy)]
struct CeilingEntry {
    fingerprint: u64,
    ceiling: f64,
}

/// Memo of adaptive outlier ceilings keyed by vessel, track and percentile.
///
/// An entry is only reused for the exact fix sequence it was computed from.
/// Entries stay valid while the percentile is unchanged; glitch distance and
/// smoothing act downstream of the ceiling and never invalidate it.
#[derive(Debug, Default)]
pub struct CeilingCache {
    percentile: Option<f64>,
    ceilings: HashMap<VesselId, CeilingEntry>,
}

impl CeilingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the active percentile, dropping every entry if it changed.
    ///
    /// Returns whether the cache was invalidated.
    pub fn set_percentile(&mut self, percentile: f64) -> bool {
        let changed = self
            .percentile
            .map_or(true, |current| current.to_bits() != percentile.to_bits());
        if changed {
            self.ceilings.clear();
            self.percentile = Some(percentile);
        }
        changed
    }

    pub fn get(&self, vessel: VesselId) -> Option<f64> {
        self.ceilings.get(&vessel).map(|entry| entry.ceiling)
    }

    /// Returns the cached ceiling for this track or computes and stores it; the
    /// flag reports a hit. A different fingerprint replaces the vessel's entry.
    pub fn get_or_insert_with<F>(&mut self, vessel: VesselId, fingerprint: u64, compute: F) -> (f64, bool)
    where
        F: FnOnce() -> f64,
    {
        if let Some(entry) = self.ceilings.get(&vessel) {
            if entry.fingerprint == fingerprint {
                return (entry.ceiling, true);
            }
        }
        let ceiling = compute();
        self.ceilings.insert(
            vessel,
            CeilingEntry {
                fingerprint,
                ceiling,
            },
        );
        (ceiling, false)
    }

    pub fn clear(&mut self) {
        self.ceilings.clear();
    }

    pub fn len(&self) -> usize {
        self.ceilings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ceilings.is_empty()
    }
}
