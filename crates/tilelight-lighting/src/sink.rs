//! Observers for light writes made by the flood fills.

use hashbrown::HashMap;
use tilelight_geom::{CellPos, Channel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    Lit,
    Cleared,
}

/// One channel write performed by the flood fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightUpdate {
    pub cell: CellPos,
    pub channel: Channel,
    pub value: f32,
    pub kind: UpdateKind,
}

/// Observer for light writes. Sinks see every write in order and cannot
/// influence the flood fills.
pub trait LightSink {
    fn record(&mut self, update: LightUpdate);
}

impl<T: LightSink + ?Sized> LightSink for &mut T {
    #[inline]
    fn record(&mut self, update: LightUpdate) {
        (**self).record(update)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LightSink for NullSink {
    #[inline]
    fn record(&mut self, _update: LightUpdate) {}
}

/// Append-only history of light writes.
#[derive(Clone, Debug, Default)]
pub struct LightJournal {
    entries: Vec<LightUpdate>,
}

impl LightJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LightUpdate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes to one cell, oldest first.
    pub fn history(&self, cell: CellPos) -> impl Iterator<Item = &LightUpdate> + '_ {
        self.entries.iter().filter(move |u| u.cell == cell)
    }

    /// Number of writes per touched cell.
    pub fn touch_counts(&self) -> HashMap<CellPos, usize> {
        let mut out = HashMap::new();
        for u in &self.entries {
            *out.entry(u.cell).or_insert(0) += 1;
        }
        out
    }
}

impl LightSink for LightJournal {
    fn record(&mut self, update: LightUpdate) {
        self.entries.push(update);
    }
}
