//! Text rendering of the light field.

use clap::ValueEnum;
use std::fmt::Write;

use tilelight_geom::{CellPos, Channel, Rgb};
use tilelight_lighting::{LightJournal, LightRegistry, LightSink};
use tilelight_world::GridStore;

const RAMP: &[u8] = b" .:-=+*#%@";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum View {
    #[value(name = "r")]
    Red,
    #[value(name = "g")]
    Green,
    #[value(name = "b")]
    Blue,
    Luma,
}

impl View {
    pub fn sample(self, c: Rgb) -> f32 {
        match self {
            View::Red => c[Channel::Red],
            View::Green => c[Channel::Green],
            View::Blue => c[Channel::Blue],
            View::Luma => c.luma(),
        }
    }
}

/// Ramp glyph for a light value in [0, 1]. Exact zero always maps to blank.
pub fn glyph(v: f32) -> char {
    if v <= 0.0 {
        return ' ';
    }
    let top = (RAMP.len() - 1) as f32;
    let i = (v.clamp(0.0, 1.0) * top).ceil() as usize;
    RAMP[i.min(RAMP.len() - 1)] as char
}

/// Heat map of the region, highest row first. Source cells print as `S`.
pub fn render_field<S: LightSink>(
    grid: &GridStore,
    lights: &LightRegistry<S>,
    min: CellPos,
    max: CellPos,
    view: View,
) -> String {
    let mut out = String::new();
    for y in (min.y..=max.y).rev() {
        for x in min.x..=max.x {
            let cell = CellPos::new(x, y);
            if lights.has_source(cell) {
                out.push('S');
            } else {
                out.push(glyph(view.sample(grid.ambient_color(cell))));
            }
        }
        out.push('\n');
    }
    out
}

/// Per-cell write counts from the journal: `0`-`9`, `+` past nine.
pub fn render_touches(journal: &LightJournal, min: CellPos, max: CellPos) -> String {
    let counts = journal.touch_counts();
    let mut out = String::new();
    for y in (min.y..=max.y).rev() {
        for x in min.x..=max.x {
            let n = counts.get(&CellPos::new(x, y)).copied().unwrap_or(0);
            let ch = match n {
                0 => '.',
                1..=9 => char::from(b'0' + n as u8),
                _ => '+',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{} writes over {} cells", journal.len(), counts.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilelight_blocks::{BlockType, Layer};
    use tilelight_world::LightingConfig;

    #[test]
    fn glyph_ends_of_ramp() {
        assert_eq!(glyph(0.0), ' ');
        assert_eq!(glyph(-1.0), ' ');
        assert_eq!(glyph(1.0), '@');
        assert_eq!(glyph(0.01), '.');
        assert_eq!(glyph(7.0), '@');
    }

    #[test]
    fn renders_rows_top_down_with_sources() {
        let mut g = GridStore::new(LightingConfig::default());
        g.provision_region(CellPos::new(0, 0), CellPos::new(3, 1));
        for x in 0..=3 {
            g.set_block(CellPos::new(x, 0), Layer::Back, BlockType::Stone);
        }
        let mut lights = LightRegistry::with_sink(LightJournal::new());
        lights.create(&mut g, CellPos::new(0, 0), Rgb::new(0.0, 1.0, 0.0), 1.0);

        let text = render_field(&g, &lights, CellPos::new(0, 0), CellPos::new(3, 1), View::Green);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows, vec!["    ", "S@@@"]);
        let red = render_field(&g, &lights, CellPos::new(0, 0), CellPos::new(3, 1), View::Red);
        assert_eq!(red.lines().nth(1), Some("S   "));

        let touches = render_touches(lights.sink(), CellPos::new(0, 0), CellPos::new(3, 1));
        let rows: Vec<&str> = touches.lines().collect();
        assert_eq!(rows[1], ".111");
        assert_eq!(rows[2], "3 writes over 3 cells");
    }
}
