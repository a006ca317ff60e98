//! Colored tile lighting: point sources flooded breadth-first through the
//! front/back occlusion layers, with retraction and refill on removal.
#![forbid(unsafe_code)]

mod ambient;
pub mod propagate;
pub mod registry;
pub mod retract;
pub mod sink;

use tilelight_geom::{CellPos, Rgb};
use tilelight_world::ChunkCoord;

pub use propagate::{Falloff, propagate, propagate_channel, seed_source};
pub use registry::{CreateOutcome, LightRegistry, LightSource, SourceId, SourceState};
pub use retract::{Retraction, retract};
pub use sink::{LightJournal, LightSink, LightUpdate, NullSink, UpdateKind};

/// Unit of work for the flood-fill queues; lives for one call only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightNode {
    pub cell: CellPos,
    pub color: Rgb,
    pub chunk: ChunkCoord,
}
