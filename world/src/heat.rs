use std::{collections::VecDeque, time::Duration};

use scorch_core::{CraterHeat, CRATER_HEAT_CAPACITY, CRATER_HEAT_DECAY, CRATER_HEAT_THRESHOLD};

/// Reference frame rate the decay factor is expressed against.
const REFERENCE_FRAMES_PER_SECOND: f32 = 60.0;

/// Bounded list of recently blasted craters, oldest first.
#[derive(Debug, Default)]
pub(crate) struct CraterHeatList {
    entries: VecDeque<CraterHeat>,
}

impl CraterHeatList {
    pub(crate) fn push(&mut self, entry: CraterHeat) {
        if self.entries.len() >= CRATER_HEAT_CAPACITY {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub(crate) fn decay(&mut self, dt: Duration) {
        let frames = dt.as_secs_f32() * REFERENCE_FRAMES_PER_SECOND;
        let factor = CRATER_HEAT_DECAY.powf(frames);
        for entry in &mut self.entries {
            entry.heat *= factor;
        }
        self.entries
            .retain(|entry| entry.heat >= CRATER_HEAT_THRESHOLD);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn snapshot(&self) -> Vec<CraterHeat> {
        self.entries.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_entry_at_capacity() {
        let mut list = CraterHeatList::default();
        for index in 0..=CRATER_HEAT_CAPACITY {
            list.push(CraterHeat::fresh(index as f32, 0.0, 10.0));
        }

        let snapshot = list.snapshot();
        assert_eq!(snapshot.len(), CRATER_HEAT_CAPACITY);
        assert_eq!(snapshot[0].x, 1.0);
    }

    #[test]
    fn one_frame_applies_single_decay_step() {
        let mut list = CraterHeatList::default();
        list.push(CraterHeat::fresh(0.0, 0.0, 10.0));

        list.decay(Duration::from_secs_f32(1.0 / 60.0));

        let heat = list.snapshot()[0].heat;
        assert!((heat - CRATER_HEAT_DECAY).abs() < 1e-4);
    }

    #[test]
    fn cold_entries_are_removed() {
        let mut list = CraterHeatList::default();
        list.push(CraterHeat::fresh(0.0, 0.0, 10.0));

        list.decay(Duration::from_secs(5));

        assert!(list.snapshot().is_empty());
    }
}
