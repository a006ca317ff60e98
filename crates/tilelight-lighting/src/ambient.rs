//! Sky light maintenance along solid/air boundaries.

use tilelight_geom::CellPos;
use tilelight_world::GridStore;

use crate::registry::{LightRegistry, SourceId};
use crate::sink::LightSink;

impl<S: LightSink> LightRegistry<S> {
    /// Seed an ambient source in every open, provisioned neighbor of `cell`.
    /// Neighbors that already hold a source are left alone. Returns the new
    /// sources.
    pub fn add_ambient_light(&mut self, grid: &mut GridStore, cell: CellPos) -> Vec<SourceId> {
        let color = grid.config().ambient_light_color;
        let strength = grid.config().ambient_light_strength;
        let mut created = Vec::new();
        for n in cell.neighbors() {
            if grid.contains(n) && grid.is_air_cell(n) {
                let outcome = self.create(grid, n, color, strength);
                if outcome.is_created() {
                    created.push(outcome.id());
                }
            }
        }
        created
    }

    /// Drop ambient sources around `cell` that no longer touch anything
    /// solid, then re-seed open faces of the solid blocks next to `cell`.
    /// Returns the number of removed sources.
    pub fn remove_ambient_light(&mut self, grid: &mut GridStore, cell: CellPos) -> usize {
        let solid = grid.solid_neighbors(cell);
        let mut removed = 0usize;
        for n in cell.neighbors() {
            if !grid.has_solid_neighbor(n) && self.remove_at(grid, n) {
                removed += 1;
            }
        }
        for s in solid {
            self.add_ambient_light(grid, s);
        }
        removed
    }
}
