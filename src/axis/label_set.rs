use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use super::AxisLabelFormatter;

/// One reusable label/gridline drawable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelSlot {
    /// Container-space coordinate along the axis (y for gridlines, x for dates).
    pub position: f64,
    pub value: f64,
    pub text: String,
    pub visible: bool,
}

/// Fixed-size group of label slots that is rewritten in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelSet {
    slots: SmallVec<[LabelSlot; 8]>,
    writes: u64,
}

impl LabelSet {
    #[must_use]
    pub fn with_capacity(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| LabelSlot::default()).collect(),
            writes: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of rewrites since construction.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    #[must_use]
    pub fn slots(&self) -> &[LabelSlot] {
        &self.slots
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = &LabelSlot> {
        self.slots.iter().filter(|slot| slot.visible)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_slots().count()
    }

    /// Repositions and retexts the slots from `(position, value)` entries.
    ///
    /// Slots past the last entry are hidden; entries past the capacity are
    /// dropped. Text buffers are reused. Returns the number of visible slots.
    pub fn write<I>(&mut self, entries: I, formatter: &dyn AxisLabelFormatter) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut entries = entries.into_iter();
        let mut visible = 0;
        for slot in &mut self.slots {
            match entries.next() {
                Some((position, value)) => {
                    slot.position = position;
                    slot.value = value;
                    slot.text.clear();
                    formatter.format_into(value, &mut slot.text);
                    slot.visible = true;
                    visible += 1;
                }
                None => slot.visible = false,
            }
        }
        self.writes += 1;
        visible
    }
}

/// Ring of pre-allocated label sets; each update goes to the next inactive set.
///
/// With two sets this is a double buffer: the set shown before an update
/// stays intact while the other one is rewritten and then activated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSetRing {
    sets: SmallVec<[LabelSet; 2]>,
    current: Option<usize>,
    shown: bool,
}

impl LabelSetRing {
    /// Creates `set_count` sets of `set_size` slots each. At least one set is created.
    #[must_use]
    pub fn new(set_count: usize, set_size: usize) -> Self {
        Self {
            sets: (0..set_count.max(1))
                .map(|_| LabelSet::with_capacity(set_size))
                .collect(),
            current: None,
            shown: false,
        }
    }

    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn sets(&self) -> &[LabelSet] {
        &self.sets
    }

    /// Index of the most recently written set.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The set currently on screen, if it has any visible slot.
    #[must_use]
    pub fn active_set(&self) -> Option<&LabelSet> {
        if !self.shown {
            return None;
        }
        self.current.map(|index| &self.sets[index])
    }

    /// Writes `entries` into the next set and makes it the active one.
    ///
    /// The previously active set is deactivated first; an update without
    /// visible entries leaves nothing shown.
    pub fn rotate<I>(&mut self, entries: I, formatter: &dyn AxisLabelFormatter) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        self.shown = false;
        let next = self
            .current
            .map_or(0, |index| (index + 1) % self.sets.len());
        self.current = Some(next);
        let visible = self.sets[next].write(entries, formatter);
        self.shown = visible > 0;
        trace!(set = next, visible, "rotated label set");
        visible
    }

    /// Deactivates the current set without touching its slots.
    pub fn hide(&mut self) {
        self.shown = false;
    }
}
