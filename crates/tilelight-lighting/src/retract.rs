//! Light removal with refill from stronger neighbors.

use std::collections::VecDeque;

use hashbrown::HashSet;
use tilelight_geom::{CellPos, Channel, Dir4, Rgb};
use tilelight_world::GridStore;

use crate::LightNode;
use crate::SourceId;
use crate::propagate::propagate_channel;
use crate::sink::{LightSink, LightUpdate, UpdateKind};

#[derive(Clone, Debug, Default)]
pub struct Retraction {
    /// Sources whose cells the removal crossed, in discovery order. Includes
    /// the source sitting at the retracted cell itself, if registered.
    pub void_sources: Vec<SourceId>,
    pub cleared: usize,
    pub refilled: usize,
}

/// Erase the light emitted at `cell` and refill the carved-out region from
/// brighter neighbors, one channel at a time.
///
/// `source_at` reports registered sources so that lights drowned out by the
/// removal can be refreshed by the caller afterwards.
pub fn retract<S, F>(
    grid: &mut GridStore,
    cell: CellPos,
    emitted: Rgb,
    source_at: F,
    sink: &mut S,
) -> Retraction
where
    S: LightSink + ?Sized,
    F: Fn(CellPos) -> Option<SourceId>,
{
    // Overlapping sources can saturate the cell above the nominal emission.
    let erase = grid.ambient_color(cell).max(emitted);
    grid.set_ambient_color(cell, Rgb::BLACK);
    for ch in Channel::ALL {
        if erase[ch] > 0.0 {
            sink.record(LightUpdate {
                cell,
                channel: ch,
                value: 0.0,
                kind: UpdateKind::Cleared,
            });
        }
    }
    let seed = LightNode {
        cell,
        color: erase,
        chunk: grid.chunk_coord_of(cell),
    };

    let mut out = Retraction::default();
    let mut removal: VecDeque<LightNode> = VecDeque::new();
    let mut refill: Vec<LightNode> = Vec::new();
    let mut visited: HashSet<CellPos> = HashSet::new();

    for ch in Channel::ALL {
        removal.clear();
        refill.clear();
        visited.clear();
        removal.push_back(seed);

        while let Some(node) = removal.pop_front() {
            if let Some(id) = source_at(node.cell) {
                if !out.void_sources.contains(&id) {
                    out.void_sources.push(id);
                }
            }
            visited.insert(node.cell);

            let value = node.color[ch];
            if value <= 0.0 {
                continue;
            }
            for dir in Dir4::FLOOD {
                let Some(n) = node.cell.step(dir) else {
                    continue;
                };
                let current = grid.ambient_color(n);
                let nv = current[ch];
                if nv <= 0.0 {
                    continue;
                }
                let next = LightNode {
                    cell: n,
                    color: current,
                    chunk: grid.chunk_coord_of(n),
                };
                if nv < value {
                    grid.set_ambient_color(n, current.with(ch, 0.0));
                    sink.record(LightUpdate {
                        cell: n,
                        channel: ch,
                        value: 0.0,
                        kind: UpdateKind::Cleared,
                    });
                    removal.push_back(next);
                    out.cleared += 1;
                } else {
                    // Lit at least as strongly from elsewhere; let it flow back in.
                    refill.push(next);
                }
            }
        }

        // A seed inside the cleared area would re-light what was just erased.
        refill.retain(|n| !visited.contains(&n.cell));
        out.refilled += propagate_channel(grid, &refill, ch, sink);
    }

    log::trace!(
        target: "lighting",
        "retract {:?}: cleared={} refilled={} voids={}",
        cell,
        out.cleared,
        out.refilled,
        out.void_sources.len()
    );
    out
}
