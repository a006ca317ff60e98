//! Minimal grid and color types shared by the tilelight crates.
#![forbid(unsafe_code)]

use core::ops::{Index, Mul};

use serde::{Deserialize, Serialize};

/// World-space cell on the unbounded 2D grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Adjacent cell in `dir`, or None past the edge of the coordinate range.
    #[inline]
    pub fn step(self, dir: Dir4) -> Option<CellPos> {
        let (dx, dy) = dir.delta();
        Some(CellPos::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The existing edge-adjacent cells, in up/down/left/right order.
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = CellPos> {
        Dir4::ALL.into_iter().filter_map(move |d| self.step(d))
    }
}

impl From<(i32, i32)> for CellPos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir4 {
    Up,
    Down,
    Left,
    Right,
}

impl Dir4 {
    /// Neighbor order used by block and ambient-light queries.
    pub const ALL: [Dir4; 4] = [Dir4::Up, Dir4::Down, Dir4::Left, Dir4::Right];
    /// Neighbor order used by the flood fills.
    pub const FLOOD: [Dir4; 4] = [Dir4::Left, Dir4::Down, Dir4::Right, Dir4::Up];

    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir4::Up => (0, 1),
            Dir4::Down => (0, -1),
            Dir4::Left => (-1, 0),
            Dir4::Right => (1, 0),
        }
    }
}

/// One of the three independently propagated color components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// Linear RGB triple. Light values live in [0, 1] per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Copy of `self` with one channel replaced.
    #[inline]
    pub fn with(self, ch: Channel, v: f32) -> Rgb {
        let mut out = self;
        match ch {
            Channel::Red => out.r = v,
            Channel::Green => out.g = v,
            Channel::Blue => out.b = v,
        }
        out
    }

    /// Channel-wise maximum.
    #[inline]
    pub fn max(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r.max(rhs.r), self.g.max(rhs.g), self.b.max(rhs.b))
    }

    #[inline]
    pub fn clamp01(self) -> Rgb {
        Rgb::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    #[inline]
    pub fn is_black(self) -> bool {
        self.r <= 0.0 && self.g <= 0.0 && self.b <= 0.0
    }

    /// Rec. 709 luma, used for text rendering of a cell.
    #[inline]
    pub fn luma(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Index<Channel> for Rgb {
    type Output = f32;
    fn index(&self, ch: Channel) -> &f32 {
        match ch {
            Channel::Red => &self.r,
            Channel::Green => &self.g,
            Channel::Blue => &self.b,
        }
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;
    #[inline]
    fn mul(self, rhs: f32) -> Rgb {
        Rgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(v: [f32; 3]) -> Self {
        Rgb::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn step_moves_by_delta_or_stops_at_range_edge(p in any::<CellPos>()) {
            for d in Dir4::ALL {
                let (dx, dy) = d.delta();
                let want = p.x.checked_add(dx).zip(p.y.checked_add(dy)).map(|(x, y)| CellPos::new(x, y));
                prop_assert_eq!(p.step(d), want);
            }
        }
    }

    #[test]
    fn corner_of_coordinate_range_has_two_neighbors() {
        let corner = CellPos::new(i32::MAX, i32::MIN);
        let ns: Vec<CellPos> = corner.neighbors().collect();
        assert_eq!(
            ns,
            vec![CellPos::new(i32::MAX, i32::MIN + 1), CellPos::new(i32::MAX - 1, i32::MIN)]
        );
        assert_eq!(corner.step(Dir4::Right), None);
        assert_eq!(corner.step(Dir4::Down), None);
        assert_eq!(CellPos::new(0, 0).neighbors().count(), 4);
    }

    #[test]
    fn flood_order_covers_all_directions() {
        for d in Dir4::ALL {
            assert!(Dir4::FLOOD.contains(&d));
        }
    }
}
