use hashbrown::HashMap;
use tilelight_blocks::{BlockType, Layer};
use tilelight_chunk::{Chunk, ChunkCoord};
use tilelight_geom::{CellPos, Rgb};

use crate::LightingConfig;

/// Colors a renderer should tint the two tile layers of one cell with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayColor {
    pub front: Rgb,
    pub back: Rgb,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct GridStats {
    pub chunks: usize,
    pub solid_chunks: usize,
    pub lit_chunks: usize,
}

/// Chunked store for block occupancy and the ambient light field.
///
/// Chunks are provisioned explicitly. Reads outside provisioned chunks see
/// air and black; writes there are dropped and reported as `false`.
pub struct GridStore {
    cfg: LightingConfig,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl GridStore {
    /// Build an empty store. A config that fails validation is replaced by
    /// the defaults, since the chunk math needs a sane chunk size.
    pub fn new(cfg: LightingConfig) -> Self {
        let cfg = match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                log::warn!(target: "grid", "{}; falling back to default lighting config", e);
                LightingConfig::default()
            }
        };
        Self {
            cfg,
            chunks: HashMap::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &LightingConfig {
        &self.cfg
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.cfg.chunk_size
    }

    #[inline]
    pub fn chunk_coord_of(&self, cell: CellPos) -> ChunkCoord {
        ChunkCoord::containing(cell, self.cfg.chunk_size)
    }

    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let size = self.cfg.chunk_size;
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord, size))
    }

    /// Provision every chunk overlapping the inclusive cell rectangle.
    pub fn provision_region(&mut self, min: CellPos, max: CellPos) {
        let lo = self.chunk_coord_of(CellPos::new(min.x.min(max.x), min.y.min(max.y)));
        let hi = self.chunk_coord_of(CellPos::new(min.x.max(max.x), min.y.max(max.y)));
        for cy in lo.cy..=hi.cy {
            for cx in lo.cx..=hi.cx {
                self.ensure_chunk(ChunkCoord::new(cx, cy));
            }
        }
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn contains(&self, cell: CellPos) -> bool {
        self.chunks.contains_key(&self.chunk_coord_of(cell))
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            chunks: self.chunks.len(),
            solid_chunks: self.chunks.values().filter(|c| c.has_non_air()).count(),
            lit_chunks: self.chunks.values().filter(|c| !c.is_unlit()).count(),
        }
    }

    #[inline]
    fn chunk_for(&self, cell: CellPos) -> Option<&Chunk> {
        self.chunks.get(&self.chunk_coord_of(cell))
    }

    #[inline]
    fn chunk_for_mut(&mut self, cell: CellPos) -> Option<&mut Chunk> {
        let coord = self.chunk_coord_of(cell);
        self.chunks.get_mut(&coord)
    }

    pub fn block_at(&self, cell: CellPos, layer: Layer) -> BlockType {
        self.chunk_for(cell)
            .and_then(|c| c.get_world(cell, layer))
            .unwrap_or(BlockType::Air)
    }

    /// Pure data write; the light field is left alone.
    pub fn set_block(&mut self, cell: CellPos, layer: Layer, block: BlockType) -> bool {
        match self.chunk_for_mut(cell) {
            Some(chunk) => chunk.set_world(cell, layer, block),
            None => {
                log::debug!(target: "grid", "set_block {:?} {:?} outside provisioned chunks", cell, layer);
                false
            }
        }
    }

    pub fn remove_block(&mut self, cell: CellPos, layer: Layer) -> bool {
        self.set_block(cell, layer, BlockType::Air)
    }

    /// True when both layers are air.
    #[inline]
    pub fn is_air_cell(&self, cell: CellPos) -> bool {
        self.block_at(cell, Layer::Front).is_air() && self.block_at(cell, Layer::Back).is_air()
    }

    pub fn has_solid_neighbor(&self, cell: CellPos) -> bool {
        cell.neighbors().any(|n| !self.is_air_cell(n))
    }

    pub fn solid_neighbors(&self, cell: CellPos) -> Vec<CellPos> {
        cell.neighbors().filter(|n| !self.is_air_cell(*n)).collect()
    }

    pub fn ambient_color(&self, cell: CellPos) -> Rgb {
        self.chunk_for(cell)
            .and_then(|c| c.light_world(cell))
            .unwrap_or(Rgb::BLACK)
    }

    /// Overwrite the stored light. Only the light engines should call this
    /// with derived values; anything else breaks their monotone invariants.
    pub fn set_ambient_color(&mut self, cell: CellPos, color: Rgb) -> bool {
        match self.chunk_for_mut(cell) {
            Some(chunk) => chunk.set_light_world(cell, color),
            None => {
                log::trace!(target: "grid", "light write {:?} outside provisioned chunks", cell);
                false
            }
        }
    }

    pub fn blended_display_color(&self, cell: CellPos) -> DisplayColor {
        let front = self.ambient_color(cell).clamp01();
        DisplayColor {
            front,
            back: front * self.cfg.back_layer_shadow_factor,
        }
    }

    /// Reset every provisioned cell to black, keeping blocks.
    pub fn clear_light(&mut self) {
        let size = self.cfg.chunk_size;
        for chunk in self.chunks.values_mut() {
            let origin = chunk.coord.origin(size);
            for ly in 0..size {
                for lx in 0..size {
                    let cell = CellPos::new(origin.x + lx as i32, origin.y + ly as i32);
                    chunk.set_light_world(cell, Rgb::BLACK);
                }
            }
        }
    }
}
