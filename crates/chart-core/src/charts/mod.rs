// File: crates/chart-core/src/charts/mod.rs
// Summary: Chart builders turning records plus injected extractors into scenes.

pub mod bar;
pub mod legend;
pub mod line;
pub mod treemap;

use std::hash::Hash;

use serde::Serialize;

use crate::color::ColorMap;
use crate::error::{ChartError, Result};
use crate::scene::Scene;
use crate::value::Value;

pub use bar::{grouped_bar_chart, GroupedBarConfig};
pub use legend::{legend, LegendConfig};
pub use line::{line_chart, LineConfig, LineStyle};
pub use treemap::{treemap_chart, TreemapConfig};

/// Field accessor injected by the caller.
pub type Extractor<T> = Box<dyn Fn(&T) -> Value>;

/// Scene plus the color map it was drawn with, for building a matching legend.
#[derive(Clone, Debug, Serialize)]
pub struct ColoredScene<V: Hash + Eq = Value> {
    pub scene: Scene,
    pub colors: ColorMap<V>,
}

fn require<'a, X: ?Sized>(extractor: &'a Option<Box<X>>, name: &'static str) -> Result<&'a X> {
    extractor.as_deref().ok_or(ChartError::MissingExtractor(name))
}

fn check_size(width: f64, height: f64) -> Result<()> {
    if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
        return Err(ChartError::invalid_config(format!("chart size must be finite and non-negative, got {width}x{height}")));
    }
    Ok(())
}
