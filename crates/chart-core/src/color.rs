// File: crates/chart-core/src/color.rs
// Summary: RGBA colors, categorical palettes and the value-to-color map shared by charts and legends.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ChartError, Result};
use crate::scale::Domain;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    /// Opaque color from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Self::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ChartError;

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || ChartError::invalid_config(format!("not a hex color: {s:?}"));
        let hex = s.strip_prefix('#').ok_or_else(bad)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17).map_err(|_| bad());
                Ok(Color::from_rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Color::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
            _ => Err(bad()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Categorical palettes.
pub mod palette {
    use super::Color;

    pub const TABLEAU10: [Color; 10] = [
        Color::hex(0x4e79a7), Color::hex(0xf28e2c), Color::hex(0xe15759), Color::hex(0x76b7b2),
        Color::hex(0x59a14f), Color::hex(0xedc949), Color::hex(0xaf7aa1), Color::hex(0xff9da7),
        Color::hex(0x9c755f), Color::hex(0xbab0ab),
    ];

    pub const SET1: [Color; 9] = [
        Color::hex(0xe41a1c), Color::hex(0x377eb8), Color::hex(0x4daf4a), Color::hex(0x984ea3),
        Color::hex(0xff7f00), Color::hex(0xffff33), Color::hex(0xa65628), Color::hex(0xf781bf),
        Color::hex(0x999999),
    ];

    pub const SET2: [Color; 8] = [
        Color::hex(0x66c2a5), Color::hex(0xfc8d62), Color::hex(0x8da0cb), Color::hex(0xe78ac3),
        Color::hex(0xa6d854), Color::hex(0xffd92f), Color::hex(0xe5c494), Color::hex(0xb3b3b3),
    ];

    pub const SET3: [Color; 12] = [
        Color::hex(0x8dd3c7), Color::hex(0xffffb3), Color::hex(0xbebada), Color::hex(0xfb8072),
        Color::hex(0x80b1d3), Color::hex(0xfdb462), Color::hex(0xb3de69), Color::hex(0xfccde5),
        Color::hex(0xd9d9d9), Color::hex(0xbc80bd), Color::hex(0xccebc5), Color::hex(0xffed6f),
    ];

    /// Palettes joined end to end.
    pub fn concat(parts: &[&[Color]]) -> Vec<Color> {
        parts.iter().flat_map(|p| p.iter().copied()).collect()
    }
}

/// Immutable assignment of palette entries to domain values, by position.
///
/// Build it once per chart and hand the same instance to the legend; two maps
/// built from the same domain order and palette assign identical colors.
#[derive(Clone, Debug)]
pub struct ColorMap<V: Hash + Eq> {
    domain: Domain<V>,
    palette: Vec<Color>,
}

impl<V: Hash + Eq> ColorMap<V> {
    pub fn new(domain: impl IntoIterator<Item = V>, palette: &[Color]) -> Result<Self> {
        if palette.is_empty() {
            return Err(ChartError::EmptyPalette);
        }
        Ok(Self { domain: domain.into_iter().collect(), palette: palette.to_vec() })
    }

    /// Color for `v`; `None` for values outside the construction domain.
    pub fn get(&self, v: &V) -> Option<Color> {
        self.domain.get_index_of(v).map(|i| self.palette[i % self.palette.len()])
    }

    pub fn domain(&self) -> &Domain<V> { &self.domain }
    pub fn palette(&self) -> &[Color] { &self.palette }
    pub fn len(&self) -> usize { self.domain.len() }
    pub fn is_empty(&self) -> bool { self.domain.is_empty() }

    /// `(value, color)` pairs in domain order.
    pub fn entries(&self) -> impl Iterator<Item = (&V, Color)> + '_ {
        self.domain.iter().enumerate().map(|(i, v)| (v, self.palette[i % self.palette.len()]))
    }
}

impl<V: Hash + Eq + Serialize> Serialize for ColorMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.domain.len()))?;
        for entry in self.entries() {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}
