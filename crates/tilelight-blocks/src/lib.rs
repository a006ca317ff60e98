//! Block kinds and tile layers.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Block occupying one layer of a cell. Only air vs. non-air matters for
/// light occlusion; the solid kinds are interchangeable there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Air,
    Dirt,
    Stone,
}

impl BlockType {
    pub const ALL: [BlockType; 3] = [BlockType::Air, BlockType::Dirt, BlockType::Stone];

    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, BlockType::Air)
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        !self.is_air()
    }

    pub const fn name(self) -> &'static str {
        match self {
            BlockType::Air => "air",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
        }
    }

    pub fn from_name(name: &str) -> Option<BlockType> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// The two occlusion planes of the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Front,
    Back,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_and_unknown_is_none() {
        for b in BlockType::ALL {
            assert_eq!(BlockType::from_name(b.name()), Some(b));
        }
        assert_eq!(BlockType::from_name("lava"), None);
    }

    #[test]
    fn only_air_is_transparent() {
        assert!(BlockType::Air.is_air());
        assert!(BlockType::Dirt.is_solid());
        assert!(BlockType::Stone.is_solid());
        assert_eq!(BlockType::default(), BlockType::Air);
    }

    #[test]
    fn layer_and_block_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Row {
            layer: Layer,
            block: BlockType,
        }
        let row: Row = toml::from_str("layer = \"back\"\nblock = \"stone\"").unwrap();
        assert_eq!(row.layer, Layer::Back);
        assert_eq!(row.block, BlockType::Stone);
    }
}
