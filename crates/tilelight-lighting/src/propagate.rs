//! Breadth-first light spreading.

use std::collections::VecDeque;

use tilelight_blocks::Layer;
use tilelight_geom::{CellPos, Channel, Dir4, Rgb};
use tilelight_world::{GridStore, LightingConfig};

use crate::LightNode;
use crate::sink::{LightSink, LightUpdate, UpdateKind};

/// Per-step falloff values derived from the config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Falloff {
    pub front: f32,
    pub back: f32,
    pub threshold: f32,
}

impl Falloff {
    pub fn from_config(cfg: &LightingConfig) -> Self {
        Self {
            front: cfg.falloff_front(),
            back: cfg.falloff_back(),
            threshold: cfg.pass_threshold(),
        }
    }

    /// Falloff for light entering `cell`, or None when the cell has no
    /// occluding layer at all. Fully open cells do not pass light on.
    #[inline]
    pub fn entering(&self, grid: &GridStore, cell: CellPos) -> Option<f32> {
        if grid.block_at(cell, Layer::Front).is_solid() {
            Some(self.front)
        } else if grid.block_at(cell, Layer::Back).is_solid() {
            Some(self.back)
        } else {
            None
        }
    }
}

/// Raise a source cell to at least `emitted` and return its seed node.
pub fn seed_source(grid: &mut GridStore, cell: CellPos, emitted: Rgb) -> LightNode {
    let lit = grid.ambient_color(cell).max(emitted);
    grid.set_ambient_color(cell, lit);
    LightNode {
        cell,
        color: emitted,
        chunk: grid.chunk_coord_of(cell),
    }
}

/// Spread one channel from `seeds` until no neighbor improves. Returns the
/// number of cell writes.
pub fn propagate_channel<S: LightSink + ?Sized>(
    grid: &mut GridStore,
    seeds: &[LightNode],
    ch: Channel,
    sink: &mut S,
) -> usize {
    let falloff = Falloff::from_config(grid.config());
    let mut queue: VecDeque<LightNode> = seeds.iter().copied().collect();
    let mut writes = 0usize;
    while let Some(node) = queue.pop_front() {
        let value = node.color[ch];
        if value <= 0.0 {
            continue;
        }
        for dir in Dir4::FLOOD {
            let Some(cell) = node.cell.step(dir) else {
                continue;
            };
            let Some(step) = falloff.entering(grid, cell) else {
                continue;
            };
            let current = grid.ambient_color(cell);
            // Only strict improvements beyond the pruning margin are written.
            if current[ch] + step + falloff.threshold < value {
                let v = (value - step).clamp(0.0, 1.0);
                let color = current.with(ch, v);
                grid.set_ambient_color(cell, color);
                sink.record(LightUpdate {
                    cell,
                    channel: ch,
                    value: v,
                    kind: UpdateKind::Lit,
                });
                queue.push_back(LightNode {
                    cell,
                    color,
                    chunk: grid.chunk_coord_of(cell),
                });
                writes += 1;
            }
        }
    }
    writes
}

/// Run each requested channel independently from the same seed snapshot.
pub fn propagate<S: LightSink + ?Sized>(
    grid: &mut GridStore,
    seeds: &[LightNode],
    channels: &[Channel],
    sink: &mut S,
) -> usize {
    if seeds.is_empty() {
        return 0;
    }
    channels
        .iter()
        .map(|&ch| propagate_channel(grid, seeds, ch, sink))
        .sum()
}
