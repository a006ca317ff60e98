use proptest::prelude::*;
use tilelight_blocks::{BlockType, Layer};
use tilelight_chunk::{Chunk, ChunkCoord, local_of};
use tilelight_geom::{CellPos, Rgb};

fn size() -> impl Strategy<Value = usize> {
    1usize..=40
}

fn coord() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

proptest! {
    // Local coordinates are always in range and recompose the world cell
    #[test]
    fn local_of_recomposes_world(x in coord(), y in coord(), s in size()) {
        let cell = CellPos::new(x, y);
        let (lx, ly) = local_of(cell, s);
        prop_assert!(lx < s && ly < s);
        let origin = ChunkCoord::containing(cell, s).origin(s);
        prop_assert_eq!(CellPos::new(origin.x + lx as i32, origin.y + ly as i32), cell);
    }

    // idx maps each local cell to a unique in-range index
    #[test]
    fn idx_is_unique_and_in_range(cx in -50i32..50, cy in -50i32..50, s in size()) {
        let chunk = Chunk::new(ChunkCoord::new(cx, cy), s);
        let mut seen = vec![false; s * s];
        for ly in 0..s { for lx in 0..s {
            let i = chunk.idx(lx, ly);
            prop_assert!(i < s * s);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // contains_world agrees with bounds and with get_world returning Some
    #[test]
    fn contains_world_matches_bounds(cx in -50i32..50, cy in -50i32..50, s in size()) {
        let chunk = Chunk::new(ChunkCoord::new(cx, cy), s);
        let (min, max) = chunk.bounds();
        let candidates = [
            min,
            max,
            CellPos::new(min.x - 1, min.y),
            CellPos::new(max.x + 1, max.y),
            CellPos::new(min.x, min.y - 1),
            CellPos::new(max.x, max.y + 1),
        ];
        for cell in candidates {
            let inside = cell.x >= min.x && cell.x <= max.x && cell.y >= min.y && cell.y <= max.y;
            prop_assert_eq!(chunk.contains_world(cell), inside);
            prop_assert_eq!(chunk.get_world(cell, Layer::Front).is_some(), inside);
            prop_assert_eq!(chunk.light_world(cell).is_some(), inside);
        }
    }

    // Writes land on exactly one layer and never touch light
    #[test]
    fn set_world_touches_only_its_layer(cx in -8i32..8, cy in -8i32..8, s in 1usize..=16, lx in 0usize..16, ly in 0usize..16) {
        prop_assume!(lx < s && ly < s);
        let mut chunk = Chunk::new(ChunkCoord::new(cx, cy), s);
        let origin = chunk.coord.origin(s);
        let cell = CellPos::new(origin.x + lx as i32, origin.y + ly as i32);
        prop_assert!(chunk.set_world(cell, Layer::Back, BlockType::Stone));
        prop_assert_eq!(chunk.get_local(lx, ly, Layer::Back), BlockType::Stone);
        prop_assert_eq!(chunk.get_local(lx, ly, Layer::Front), BlockType::Air);
        prop_assert_eq!(chunk.light_local(lx, ly), Rgb::BLACK);
        prop_assert!(chunk.has_non_air());
    }
}

#[test]
fn negative_cells_map_to_the_previous_chunk() {
    assert_eq!(ChunkCoord::containing(CellPos::new(-1, -1), 32), ChunkCoord::new(-1, -1));
    assert_eq!(local_of(CellPos::new(-1, -33), 32), (31, 31));
    assert_eq!(ChunkCoord::containing(CellPos::new(31, 32), 32), ChunkCoord::new(0, 1));
}

#[test]
fn writes_outside_the_chunk_are_rejected() {
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 4);
    assert!(!chunk.set_world(CellPos::new(4, 0), Layer::Front, BlockType::Dirt));
    assert!(!chunk.set_light_world(CellPos::new(-1, 0), Rgb::WHITE));
    assert!(!chunk.has_non_air());
    assert!(chunk.is_unlit());
}
