//! Light source registry: creation, removal and per-source bookkeeping.

use std::collections::VecDeque;

use hashbrown::HashMap;
use tilelight_geom::{CellPos, Channel, Rgb};
use tilelight_world::GridStore;

use crate::propagate::{propagate, seed_source};
use crate::retract::retract;
use crate::sink::{LightSink, NullSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceState {
    Idle,
    Updating,
    Removing,
}

#[derive(Clone, Debug)]
pub struct LightSource {
    pub id: SourceId,
    pub cell: CellPos,
    pub color: Rgb,
    pub strength: f32,
    pub state: SourceState,
}

impl LightSource {
    #[inline]
    pub fn emitted(&self) -> Rgb {
        self.color * self.strength
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(SourceId),
    AlreadyPresent(SourceId),
}

impl CreateOutcome {
    #[inline]
    pub fn id(self) -> SourceId {
        match self {
            CreateOutcome::Created(id) | CreateOutcome::AlreadyPresent(id) => id,
        }
    }

    #[inline]
    pub fn is_created(self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// Owner of all point light sources; at most one per cell.
///
/// Every mutation immediately settles the grid's light field. Writes are
/// reported to the sink `S`.
pub struct LightRegistry<S: LightSink = NullSink> {
    pub(crate) sources: HashMap<SourceId, LightSource>,
    pub(crate) by_cell: HashMap<CellPos, SourceId>,
    next_id: u64,
    sink: S,
}

impl Default for LightRegistry<NullSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl LightRegistry<NullSink> {
    pub fn new() -> Self {
        Self::with_sink(NullSink)
    }
}

impl<S: LightSink> LightRegistry<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            sources: HashMap::new(),
            by_cell: HashMap::new(),
            next_id: 1,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline]
    pub fn get(&self, cell: CellPos) -> Option<SourceId> {
        self.by_cell.get(&cell).copied()
    }

    #[inline]
    pub fn has_source(&self, cell: CellPos) -> bool {
        self.by_cell.contains_key(&cell)
    }

    #[inline]
    pub fn source(&self, id: SourceId) -> Option<&LightSource> {
        self.sources.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LightSource> + '_ {
        self.sources.values()
    }

    /// Register a source at `cell` and flood its light. A cell already
    /// holding a source is left as is.
    pub fn create(
        &mut self,
        grid: &mut GridStore,
        cell: CellPos,
        color: Rgb,
        strength: f32,
    ) -> CreateOutcome {
        if let Some(id) = self.get(cell) {
            return CreateOutcome::AlreadyPresent(id);
        }
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.sources.insert(
            id,
            LightSource {
                id,
                cell,
                color,
                strength,
                state: SourceState::Idle,
            },
        );
        self.by_cell.insert(cell, id);
        log::debug!(target: "lighting", "source {:?} created at {:?} color={:?} strength={}", id, cell, color, strength);
        self.update(grid, id);
        CreateOutcome::Created(id)
    }

    /// Re-flood a source's light from scratch. Returns false for unknown
    /// sources and for sources already mid-operation.
    pub fn update(&mut self, grid: &mut GridStore, id: SourceId) -> bool {
        let Some(src) = self.sources.get_mut(&id) else {
            return false;
        };
        if src.state != SourceState::Idle {
            log::debug!(target: "lighting", "skip update of {:?}: {:?}", id, src.state);
            return false;
        }
        src.state = SourceState::Updating;
        let (cell, emitted) = (src.cell, src.emitted());

        let seed = seed_source(grid, cell, emitted);
        let writes = propagate(grid, &[seed], &Channel::ALL, &mut self.sink);
        log::trace!(target: "lighting", "update {:?} at {:?}: {} writes", id, cell, writes);

        if let Some(src) = self.sources.get_mut(&id) {
            src.state = SourceState::Idle;
        }
        true
    }

    /// Retract a source's light, refresh every source whose light the
    /// retraction erased, then drop the source.
    pub fn remove(&mut self, grid: &mut GridStore, id: SourceId) -> bool {
        let Some(src) = self.sources.get_mut(&id) else {
            return false;
        };
        if src.state != SourceState::Idle {
            log::debug!(target: "lighting", "skip removal of {:?}: {:?}", id, src.state);
            return false;
        }
        src.state = SourceState::Removing;
        let (cell, emitted) = (src.cell, src.emitted());

        let by_cell = &self.by_cell;
        let retraction = retract(grid, cell, emitted, |c| by_cell.get(&c).copied(), &mut self.sink);

        let mut worklist: VecDeque<SourceId> = retraction
            .void_sources
            .into_iter()
            .filter(|v| *v != id)
            .collect();
        let mut refreshed = 0usize;
        while let Some(void) = worklist.pop_front() {
            match self.sources.get(&void).map(|s| s.state) {
                Some(SourceState::Idle) => {
                    self.update(grid, void);
                    refreshed += 1;
                }
                Some(state) => {
                    log::debug!(target: "lighting", "void light {:?} busy ({:?}); not refreshed", void, state);
                }
                None => {}
            }
        }

        self.sources.remove(&id);
        self.by_cell.remove(&cell);
        log::debug!(
            target: "lighting",
            "source {:?} removed from {:?}: cleared={} refilled={} voids refreshed={}",
            id,
            cell,
            retraction.cleared,
            retraction.refilled,
            refreshed
        );
        true
    }

    /// Remove whatever source sits at `cell`, if any.
    pub fn remove_at(&mut self, grid: &mut GridStore, cell: CellPos) -> bool {
        match self.get(cell) {
            Some(id) => self.remove(grid, id),
            None => false,
        }
    }
}
