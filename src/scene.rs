//! Scene files: a provisioned region, bulk block fills, and a list of edits
//! replayed through the editor.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use tilelight_blocks::{BlockType, Layer};
use tilelight_edit::{EditOutcome, Editor};
use tilelight_geom::{CellPos, Rgb};
use tilelight_lighting::{LightRegistry, LightSink};
use tilelight_world::{GridStore, LightingConfig};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub region: Region,
    #[serde(default)]
    pub fill: Vec<Fill>,
    #[serde(default)]
    pub op: Vec<Op>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Region {
    pub min: [i32; 2],
    pub max: [i32; 2],
}

impl Region {
    pub fn min_cell(&self) -> CellPos {
        CellPos::new(self.min[0], self.min[1])
    }

    pub fn max_cell(&self) -> CellPos {
        CellPos::new(self.max[0], self.max[1])
    }

    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        (self.min[1]..=self.max[1])
            .flat_map(move |y| (self.min[0]..=self.max[0]).map(move |x| CellPos::new(x, y)))
    }
}

/// Block rectangle written straight into the grid, without light updates.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Fill {
    pub layer: Layer,
    #[serde(default = "default_block")]
    pub block: BlockType,
    pub min: [i32; 2],
    pub max: [i32; 2],
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Op {
    Place {
        at: [i32; 2],
        layer: Layer,
        #[serde(default = "default_block")]
        block: BlockType,
    },
    Remove {
        at: [i32; 2],
        layer: Layer,
    },
    Light {
        at: [i32; 2],
        #[serde(default = "default_color")]
        color: Rgb,
        #[serde(default = "default_strength")]
        strength: f32,
    },
    Unlight {
        at: [i32; 2],
    },
    /// Seed sky light around one block, or around every exposed block of
    /// the region when `at` is omitted.
    Ambient {
        #[serde(default)]
        at: Option<[i32; 2]>,
    },
}

fn default_block() -> BlockType {
    BlockType::Dirt
}
fn default_color() -> Rgb {
    Rgb::WHITE
}
fn default_strength() -> f32 {
    1.0
}

fn cell(at: [i32; 2]) -> CellPos {
    CellPos::new(at[0], at[1])
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub unchanged: usize,
    pub out_of_bounds: usize,
    pub ambient_sources: usize,
}

impl ApplyReport {
    fn count(&mut self, outcome: EditOutcome) {
        match outcome {
            EditOutcome::Applied { .. } => self.applied += 1,
            EditOutcome::Unchanged => self.unchanged += 1,
            EditOutcome::OutOfBounds => self.out_of_bounds += 1,
        }
    }
}

impl Scene {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let scene: Scene = toml::from_str(s)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| format!("failed to read scene {}: {}", path.display(), e))?;
        Self::from_toml_str(&s)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        let r = &self.region;
        if r.min[0] > r.max[0] || r.min[1] > r.max[1] {
            return Err(format!("scene region min {:?} exceeds max {:?}", r.min, r.max).into());
        }
        for (i, f) in self.fill.iter().enumerate() {
            if f.min[0] > f.max[0] || f.min[1] > f.max[1] {
                return Err(format!("fill #{} min {:?} exceeds max {:?}", i, f.min, f.max).into());
            }
        }
        for (i, op) in self.op.iter().enumerate() {
            if let Op::Light { strength, .. } = op {
                if !(0.0..=1.0).contains(strength) {
                    return Err(format!("op #{} light strength {} outside [0, 1]", i, strength).into());
                }
            }
        }
        Ok(())
    }

    /// Provision the region and write the fills. Fill cells outside the
    /// region are dropped by the grid.
    pub fn build_grid(&self, cfg: LightingConfig) -> GridStore {
        let mut grid = GridStore::new(cfg);
        grid.provision_region(self.region.min_cell(), self.region.max_cell());
        for f in &self.fill {
            for y in f.min[1]..=f.max[1] {
                for x in f.min[0]..=f.max[0] {
                    grid.set_block(CellPos::new(x, y), f.layer, f.block);
                }
            }
        }
        log::debug!(target: "edit", "scene grid ready: {:?}", grid.stats());
        grid
    }

    /// Replay the ops in order.
    pub fn apply<S: LightSink>(
        &self,
        grid: &mut GridStore,
        lights: &mut LightRegistry<S>,
        editor: &mut Editor,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        for op in &self.op {
            match *op {
                Op::Place { at, layer, block } => {
                    report.count(editor.place_block(grid, lights, cell(at), layer, block));
                }
                Op::Remove { at, layer } => {
                    report.count(editor.remove_block(grid, lights, cell(at), layer));
                }
                Op::Light {
                    at,
                    color,
                    strength,
                } => {
                    report.count(editor.place_light(grid, lights, cell(at), color, strength));
                }
                Op::Unlight { at } => {
                    report.count(editor.remove_light(grid, lights, cell(at)));
                }
                Op::Ambient { at: Some(at) } => {
                    report.ambient_sources += editor.seed_ambient(grid, lights, cell(at));
                }
                Op::Ambient { at: None } => {
                    let exposed: Vec<CellPos> = self
                        .region
                        .cells()
                        .filter(|c| !grid.is_air_cell(*c) && grid.solid_neighbors(*c).len() < 4)
                        .collect();
                    for c in exposed {
                        report.ambient_sources += editor.seed_ambient(grid, lights, c);
                    }
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilelight_world::ChunkCoord;

    const SAMPLE: &str = r#"
[region]
min = [-8, -4]
max = [7, 3]

[[fill]]
layer = "back"
block = "stone"
min = [-8, -4]
max = [7, 0]

[[op]]
kind = "light"
at = [0, -2]
color = [1.0, 0.5, 0.0]

[[op]]
kind = "place"
at = [3, 1]
layer = "front"

[[op]]
kind = "light"
at = [0, -2]

[[op]]
kind = "unlight"
at = [40, 40]
"#;

    #[test]
    fn parses_fills_and_tagged_ops() {
        let scene = Scene::from_toml_str(SAMPLE).unwrap();
        assert_eq!(scene.region.min, [-8, -4]);
        assert_eq!(scene.fill[0].block, BlockType::Stone);
        assert_eq!(scene.op.len(), 4);
        assert_eq!(
            scene.op[0],
            Op::Light {
                at: [0, -2],
                color: Rgb::new(1.0, 0.5, 0.0),
                strength: 1.0
            }
        );
        assert_eq!(
            scene.op[1],
            Op::Place {
                at: [3, 1],
                layer: Layer::Front,
                block: BlockType::Dirt
            }
        );
    }

    #[test]
    fn rejects_bad_scenes() {
        assert!(Scene::from_toml_str("[region]\nmin = [4, 0]\nmax = [0, 0]\n").is_err());
        assert!(Scene::from_toml_str("[region]\nmin = [0, 0]\nmax = [1, 1]\nextra = 1\n").is_err());
        let bad_op = "[region]\nmin = [0, 0]\nmax = [1, 1]\n[[op]]\nkind = \"explode\"\nat = [0, 0]\n";
        assert!(Scene::from_toml_str(bad_op).is_err());
        let bad_strength =
            "[region]\nmin = [0, 0]\nmax = [1, 1]\n[[op]]\nkind = \"light\"\nat = [0, 0]\nstrength = 2.0\n";
        assert!(Scene::from_toml_str(bad_strength).is_err());
        assert!(Scene::from_path("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn apply_counts_outcomes() {
        let scene = Scene::from_toml_str(SAMPLE).unwrap();
        let mut grid = scene.build_grid(LightingConfig::default());
        let mut lights = LightRegistry::new();
        let mut editor = Editor::for_grid(&grid);
        let report = scene.apply(&mut grid, &mut lights, &mut editor);
        assert_eq!(report.applied, 2);
        // Second light on the same cell, and the unlight far outside the region.
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.out_of_bounds, 1);
        // Sky light around the new block reaches the light's cell too.
        let at_light = grid.ambient_color(CellPos::new(0, -2));
        assert_eq!(at_light.r, 1.0);
        assert!(at_light.g >= 0.5 && at_light.b > 0.0);
    }

    #[test]
    fn region_wide_ambient_lines_the_surface() {
        let src = r#"
[region]
min = [0, 0]
max = [5, 3]

[[fill]]
layer = "front"
min = [0, 0]
max = [5, 1]

[[op]]
kind = "ambient"
"#;
        let scene = Scene::from_toml_str(src).unwrap();
        let mut grid = scene.build_grid(LightingConfig::default());
        let mut lights = LightRegistry::new();
        let mut editor = Editor::for_grid(&grid);
        let report = scene.apply(&mut grid, &mut lights, &mut editor);
        for x in 0..=5 {
            assert!(lights.has_source(CellPos::new(x, 2)), "x={}", x);
            assert_eq!(grid.ambient_color(CellPos::new(x, 2)), Rgb::WHITE);
        }
        // The right faces share chunk (0, 0) with the floor even though they
        // lie past the scene region; the faces below and left do not.
        assert!(lights.has_source(CellPos::new(6, 0)));
        assert!(lights.has_source(CellPos::new(6, 1)));
        assert!(!lights.has_source(CellPos::new(-1, 0)));
        assert_eq!(lights.len(), 8);
        assert_eq!(report.ambient_sources, 8);
        assert!(editor.needs_redraw(ChunkCoord::new(0, 0)));
        assert!(approx_eq(grid.ambient_color(CellPos::new(3, 1)).r, 0.875));
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-6
    }
}
