//! Grid store and lighting configuration.
#![forbid(unsafe_code)]

pub mod config;
pub mod grid;

pub use config::{ConfigError, LightingConfig, MAX_CHUNK_SIZE};
pub use grid::{DisplayColor, GridStats, GridStore};
pub use tilelight_chunk::{Chunk, ChunkCoord};
