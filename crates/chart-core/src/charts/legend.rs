// File: crates/chart-core/src/charts/legend.rs
// Summary: Categorical swatch legend drawn from the color map a chart was built with.

use std::fmt::Display;
use std::hash::Hash;

use crate::axis::{band_ticks, Axis, AxisTitle};
use crate::color::ColorMap;
use crate::scale::BandScale;
use crate::scene::{Font, GroupMark, RectMark, Scene, Style, TextAnchor};
use crate::types::Insets;

pub struct LegendConfig<V> {
    pub title: Option<String>,
    pub tick_size: f64,
    pub width: f64,
    /// Defaults to `44 + tick_size`.
    pub height: Option<f64>,
    /// Defaults to top 18, bottom `16 + tick_size`, no sides.
    pub margin: Option<Insets>,
    /// Subset/order of labelled entries; every entry when `None`.
    pub tick_values: Option<Vec<V>>,
    pub tick_format: Option<Box<dyn Fn(&V) -> String>>,
}

impl<V> Default for LegendConfig<V> {
    fn default() -> Self {
        Self { title: None, tick_size: 6.0, width: 320.0, height: None, margin: None, tick_values: None, tick_format: None }
    }
}

impl<V> LegendConfig<V> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn tick_size(mut self, size: f64) -> Self {
        self.tick_size = size;
        self
    }
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
    pub fn tick_format(mut self, f: impl Fn(&V) -> String + 'static) -> Self {
        self.tick_format = Some(Box::new(f));
        self
    }

    fn resolved_height(&self) -> f64 {
        self.height.unwrap_or(44.0 + self.tick_size)
    }

    fn resolved_margin(&self) -> Insets {
        self.margin.unwrap_or(Insets::new(0.0, 0.0, 18.0, 16.0 + self.tick_size))
    }
}

/// One swatch per color-map entry, in domain order, over a labelled bottom axis.
/// Swatch colors are read from `colors`, so they always agree with the chart.
pub fn legend<V: Hash + Eq + Clone + Display>(colors: &ColorMap<V>, config: &LegendConfig<V>) -> Scene {
    let width = config.width;
    let height = config.resolved_height();
    let m = config.resolved_margin();

    let x = BandScale::new(colors.domain().iter().cloned(), [m.left, width - m.right]).round(true);

    let mut scene = Scene::new(width, height);
    scene.font = Font::sans_serif(10.0);

    let mut swatches = GroupMark::default();
    for (v, color) in colors.entries() {
        let Some(x0) = x.position(v) else { continue };
        swatches.push(RectMark {
            x: x0,
            y: m.top,
            width: (x.bandwidth() - 1.0).max(0.0),
            height: (height - m.top - m.bottom).max(0.0),
            style: Style::fill(color),
        });
    }
    scene.push(swatches);

    let ticks = band_ticks(&x, config.tick_values.as_deref(), config.tick_format.as_deref());
    let mut axis = Axis::bottom(ticks, [m.left, width - m.right], height - m.bottom)
        .tick_size(config.tick_size)
        .without_domain();
    if let Some(title) = &config.title {
        axis = axis.title(AxisTitle::bold(title, m.left, m.top + m.bottom - height - 6.0, TextAnchor::Start));
    }
    scene.push(axis.to_primitive());
    scene
}
