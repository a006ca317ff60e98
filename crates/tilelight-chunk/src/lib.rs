//! Fixed-size square chunks holding two block layers and the light field.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use tilelight_blocks::{BlockType, Layer};
use tilelight_geom::{CellPos, Rgb};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Chunk owning `cell` for chunks of `size` cells per side.
    #[inline]
    pub fn containing(cell: CellPos, size: usize) -> Self {
        let s = size as i32;
        Self::new(cell.x.div_euclid(s), cell.y.div_euclid(s))
    }

    /// World position of the chunk's (0, 0) local cell.
    #[inline]
    pub fn origin(self, size: usize) -> CellPos {
        let s = size as i32;
        CellPos::new(self.cx * s, self.cy * s)
    }

    /// Neighboring chunk coordinate, or None past the edge of the range.
    #[inline]
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.cx.checked_add(dx)?, self.cy.checked_add(dy)?))
    }
}

/// Local (x, y) inside a chunk of `size`: world mod size, normalised to be
/// non-negative.
#[inline]
pub fn local_of(cell: CellPos, size: usize) -> (usize, usize) {
    let s = size as i32;
    (cell.x.rem_euclid(s) as usize, cell.y.rem_euclid(s) as usize)
}

#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub size: usize,
    front: Vec<BlockType>,
    back: Vec<BlockType>,
    light: Vec<Rgb>,
}

impl Chunk {
    /// All-air, unlit chunk.
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        let n = size * size;
        Self {
            coord,
            size,
            front: vec![BlockType::Air; n],
            back: vec![BlockType::Air; n],
            light: vec![Rgb::BLACK; n],
        }
    }

    #[inline]
    pub fn idx(&self, lx: usize, ly: usize) -> usize {
        lx + ly * self.size
    }

    #[inline]
    fn layer(&self, layer: Layer) -> &[BlockType] {
        match layer {
            Layer::Front => &self.front,
            Layer::Back => &self.back,
        }
    }

    #[inline]
    fn layer_mut(&mut self, layer: Layer) -> &mut [BlockType] {
        match layer {
            Layer::Front => &mut self.front,
            Layer::Back => &mut self.back,
        }
    }

    #[inline]
    pub fn contains_world(&self, cell: CellPos) -> bool {
        ChunkCoord::containing(cell, self.size) == self.coord
    }

    /// Index of a world cell, or None when it belongs to another chunk.
    #[inline]
    fn world_idx(&self, cell: CellPos) -> Option<usize> {
        if !self.contains_world(cell) {
            return None;
        }
        let (lx, ly) = local_of(cell, self.size);
        Some(self.idx(lx, ly))
    }

    #[inline]
    pub fn get_local(&self, lx: usize, ly: usize, layer: Layer) -> BlockType {
        self.layer(layer)[self.idx(lx, ly)]
    }

    #[inline]
    pub fn light_local(&self, lx: usize, ly: usize) -> Rgb {
        self.light[self.idx(lx, ly)]
    }

    #[inline]
    pub fn get_world(&self, cell: CellPos, layer: Layer) -> Option<BlockType> {
        self.world_idx(cell).map(|i| self.layer(layer)[i])
    }

    pub fn set_world(&mut self, cell: CellPos, layer: Layer, block: BlockType) -> bool {
        match self.world_idx(cell) {
            Some(i) => {
                self.layer_mut(layer)[i] = block;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn light_world(&self, cell: CellPos) -> Option<Rgb> {
        self.world_idx(cell).map(|i| self.light[i])
    }

    pub fn set_light_world(&mut self, cell: CellPos, color: Rgb) -> bool {
        match self.world_idx(cell) {
            Some(i) => {
                self.light[i] = color;
                true
            }
            None => false,
        }
    }

    /// Inclusive world-space bounds `(min, max)` of this chunk.
    pub fn bounds(&self) -> (CellPos, CellPos) {
        let min = self.coord.origin(self.size);
        let s = self.size as i32 - 1;
        (min, CellPos::new(min.x + s, min.y + s))
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.front.iter().chain(self.back.iter()).any(|b| b.is_solid())
    }

    #[inline]
    pub fn is_unlit(&self) -> bool {
        self.light.iter().all(|c| c.is_black())
    }
}
