//! Block and light edits with their lighting side effects, plus per-chunk
//! revisions for redraw tracking.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use tilelight_blocks::{BlockType, Layer};
use tilelight_geom::{CellPos, Rgb};
use tilelight_lighting::{LightRegistry, LightSink};
use tilelight_world::{ChunkCoord, GridStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Applied { rev: u64 },
    Unchanged,
    OutOfBounds,
}

impl EditOutcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct EditorStats {
    pub rev_entries: usize,
    pub rendered_entries: usize,
    pub last_rev: u64,
}

/// Applies edits to a grid and keeps its light field settled.
pub struct Editor {
    size: i32,
    // latest edit stamp affecting each chunk
    rev: HashMap<ChunkCoord, u64>,
    // last stamp a renderer has seen per chunk
    rendered: HashMap<ChunkCoord, u64>,
    counter: u64,
}

impl Editor {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            size: i32::try_from(chunk_size).unwrap_or(i32::MAX).max(1),
            rev: HashMap::new(),
            rendered: HashMap::new(),
            counter: 0,
        }
    }

    pub fn for_grid(grid: &GridStore) -> Self {
        Self::new(grid.chunk_size())
    }

    pub fn stats(&self) -> EditorStats {
        EditorStats {
            rev_entries: self.rev.len(),
            rendered_entries: self.rendered.len(),
            last_rev: self.counter,
        }
    }

    /// Place `block` on `layer`. Only fills empty slots; placing air removes.
    pub fn place_block<S: LightSink>(
        &mut self,
        grid: &mut GridStore,
        lights: &mut LightRegistry<S>,
        cell: CellPos,
        layer: Layer,
        block: BlockType,
    ) -> EditOutcome {
        if block.is_air() {
            return self.remove_block(grid, lights, cell, layer);
        }
        if !grid.contains(cell) {
            return EditOutcome::OutOfBounds;
        }
        if !grid.block_at(cell, layer).is_air() {
            return EditOutcome::Unchanged;
        }
        grid.set_block(cell, layer, block);
        match layer {
            Layer::Front => {
                grid.set_ambient_color(cell, Rgb::BLACK);
                lights.add_ambient_light(grid, cell);
                darken_around(grid, lights, cell);
            }
            Layer::Back => {
                lights.add_ambient_light(grid, cell);
            }
        }
        let rev = self.bump_region_around(cell);
        log::info!(target: "edit", "placed {} on {:?} at {:?} (rev {})", block.name(), layer, cell, rev);
        EditOutcome::Applied { rev }
    }

    pub fn remove_block<S: LightSink>(
        &mut self,
        grid: &mut GridStore,
        lights: &mut LightRegistry<S>,
        cell: CellPos,
        layer: Layer,
    ) -> EditOutcome {
        if !grid.contains(cell) {
            return EditOutcome::OutOfBounds;
        }
        if grid.block_at(cell, layer).is_air() {
            return EditOutcome::Unchanged;
        }
        grid.remove_block(cell, layer);
        let removed = lights.remove_ambient_light(grid, cell);
        let rev = self.bump_region_around(cell);
        log::info!(
            target: "edit",
            "removed {:?} block at {:?} (rev {}, {} ambient sources dropped)",
            layer,
            cell,
            rev,
            removed
        );
        EditOutcome::Applied { rev }
    }

    pub fn place_light<S: LightSink>(
        &mut self,
        grid: &mut GridStore,
        lights: &mut LightRegistry<S>,
        cell: CellPos,
        color: Rgb,
        strength: f32,
    ) -> EditOutcome {
        if !grid.contains(cell) {
            return EditOutcome::OutOfBounds;
        }
        if !lights.create(grid, cell, color, strength).is_created() {
            return EditOutcome::Unchanged;
        }
        EditOutcome::Applied {
            rev: self.bump_region_around(cell),
        }
    }

    pub fn remove_light<S: LightSink>(
        &mut self,
        grid: &mut GridStore,
        lights: &mut LightRegistry<S>,
        cell: CellPos,
    ) -> EditOutcome {
        if !grid.contains(cell) {
            return EditOutcome::OutOfBounds;
        }
        if !lights.remove_at(grid, cell) {
            return EditOutcome::Unchanged;
        }
        EditOutcome::Applied {
            rev: self.bump_region_around(cell),
        }
    }

    /// Seed sky light on the open faces of `cell` and stamp the chunks those
    /// faces live in. Returns the number of new sources.
    pub fn seed_ambient<S: LightSink>(
        &mut self,
        grid: &mut GridStore,
        lights: &mut LightRegistry<S>,
        cell: CellPos,
    ) -> usize {
        let created = lights.add_ambient_light(grid, cell).len();
        if created > 0 {
            let rev = self.bump_region_around(cell);
            log::debug!(target: "edit", "seeded {} ambient sources around {:?} (rev {})", created, cell, rev);
        }
        created
    }

    #[inline]
    fn chunk_key(&self, cell: CellPos) -> ChunkCoord {
        ChunkCoord::new(cell.x.div_euclid(self.size), cell.y.div_euclid(self.size))
    }

    /// Edge-adjacent chunk offsets for a cell on a chunk border.
    fn edge_offsets(&self, cell: CellPos) -> (Vec<i32>, Vec<i32>) {
        let lx = cell.x.rem_euclid(self.size);
        let ly = cell.y.rem_euclid(self.size);
        let mut xs = vec![0];
        let mut ys = vec![0];
        if lx == 0 {
            xs.push(-1);
        }
        if lx == self.size - 1 {
            xs.push(1);
        }
        if ly == 0 {
            ys.push(-1);
        }
        if ly == self.size - 1 {
            ys.push(1);
        }
        (xs, ys)
    }

    /// Stamp the chunk holding `cell`, plus its neighbors when `cell` sits
    /// on a chunk edge. Returns the new stamp.
    fn bump_region_around(&mut self, cell: CellPos) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        let stamp = self.counter;
        for key in self.affected_chunks(cell) {
            self.rev.insert(key, stamp);
        }
        stamp
    }

    /// Chunks whose appearance an edit at `cell` can change directly; the
    /// owning chunk comes first.
    pub fn affected_chunks(&self, cell: CellPos) -> Vec<ChunkCoord> {
        let base = self.chunk_key(cell);
        let (xs, ys) = self.edge_offsets(cell);
        let mut affected = vec![base];
        for dx in &xs {
            for dy in &ys {
                let Some(key) = base.checked_offset(*dx, *dy) else {
                    continue;
                };
                if !affected.contains(&key) {
                    affected.push(key);
                }
            }
        }
        affected
    }

    pub fn get_rev(&self, coord: ChunkCoord) -> u64 {
        self.rev.get(&coord).copied().unwrap_or(0)
    }

    pub fn mark_rendered(&mut self, coord: ChunkCoord, rev: u64) {
        let e = self.rendered.entry(coord).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn needs_redraw(&self, coord: ChunkCoord) -> bool {
        self.get_rev(coord) > self.rendered.get(&coord).copied().unwrap_or(0)
    }

    /// Chunks edited since they were last rendered, in coordinate order.
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self
            .rev
            .keys()
            .copied()
            .filter(|c| self.needs_redraw(*c))
            .collect();
        out.sort();
        out
    }
}

/// Pull the light back out of a freshly filled cell: seed a source there
/// with the cell's current color (or reuse the one already there) and
/// retract it, letting the surrounding sources refill what they can.
fn darken_around<S: LightSink>(grid: &mut GridStore, lights: &mut LightRegistry<S>, cell: CellPos) {
    let current = grid.blended_display_color(cell).front;
    let strength = grid.config().ambient_light_strength;
    let id = lights.create(grid, cell, current, strength).id();
    lights.remove(grid, id);
}
