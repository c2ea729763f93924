// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (sizes, margins, scale kinds).

use serde::{Deserialize, Serialize};

/// Default chart width in pixels.
pub const WIDTH: f64 = 640.0;
/// Default chart height in pixels.
pub const HEIGHT: f64 = 400.0;

/// Margins around a plot, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }
}

/// Kind of continuous scale used for a quantitative channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    /// UTC time; values are dates or epoch milliseconds.
    Time,
}
