// File: crates/chart-core/src/charts/line.rs
// Summary: Line chart over a temporal or linear x; the path breaks wherever a point is undefined.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_size, require, Extractor};
use crate::axis::{ticks, Axis, AxisTitle};
use crate::color::Color;
use crate::error::Result;
use crate::scale::{extent, zero_baseline, ContinuousScale};
use crate::scene::{LineCap, LineJoin, Paint, PathCommand, PathMark, Scene, Style, TextAnchor};
use crate::types::{Insets, ScaleType, HEIGHT, WIDTH};

/// Stroke of the data line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// `None` strokes with the renderer's current color.
    pub color: Option<Color>,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    pub linecap: LineCap,
    pub linejoin: LineJoin,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self { color: None, stroke_width: 1.5, stroke_opacity: 1.0, linecap: LineCap::Round, linejoin: LineJoin::Round }
    }
}

impl LineStyle {
    fn to_style(self) -> Style {
        Style {
            fill: Some(Paint::None),
            stroke: Some(self.color.map_or(Paint::CurrentColor, Paint::Color)),
            stroke_width: Some(self.stroke_width),
            stroke_opacity: Some(self.stroke_opacity),
            stroke_linecap: Some(self.linecap),
            stroke_linejoin: Some(self.linejoin),
            ..Style::default()
        }
    }
}

pub struct LineConfig<T> {
    /// x value: a date, or a number (epoch milliseconds for a time axis). Required.
    pub x: Option<Extractor<T>>,
    /// y value. Required.
    pub y: Option<Extractor<T>>,
    pub width: f64,
    pub height: f64,
    pub margin: Insets,
    pub x_type: ScaleType,
    pub x_range: Option<[f64; 2]>,
    pub y_type: ScaleType,
    pub y_range: Option<[f64; 2]>,
    pub x_label: String,
    pub y_label: String,
    pub line: LineStyle,
}

impl<T> Default for LineConfig<T> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::new(40.0, 30.0, 20.0, 30.0),
            x_type: ScaleType::Time,
            x_range: None,
            y_type: ScaleType::Linear,
            y_range: None,
            x_label: String::new(),
            y_label: String::new(),
            line: LineStyle::default(),
        }
    }
}

impl<T> LineConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn x(mut self, f: impl Fn(&T) -> crate::value::Value + 'static) -> Self {
        self.x = Some(Box::new(f));
        self
    }
    pub fn y(mut self, f: impl Fn(&T) -> crate::value::Value + 'static) -> Self {
        self.y = Some(Box::new(f));
        self
    }
}

/// Path commands through the defined points in index order; every run of
/// defined points after a gap starts with a fresh `MoveTo`.
pub fn segmented_path(points: impl IntoIterator<Item = Option<(f64, f64)>>) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut in_run = false;
    for p in points {
        match p {
            Some((x, y)) if in_run => commands.push(PathCommand::LineTo { x, y }),
            Some((x, y)) => {
                commands.push(PathCommand::MoveTo { x, y });
                in_run = true;
            }
            None => in_run = false,
        }
    }
    commands
}

pub fn line_chart<T>(data: &[T], config: &LineConfig<T>) -> Result<Scene> {
    let x = require(&config.x, "x")?;
    let y = require(&config.y, "y")?;
    check_size(config.width, config.height)?;

    let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
    let xs: Vec<Option<f64>> = data.iter().map(|d| finite(x(d).as_f64())).collect();
    let ys: Vec<Option<f64>> = data.iter().map(|d| finite(y(d).as_f64())).collect();

    let x_domain = extent(xs.iter().flatten().copied()).unwrap_or([0.0, 0.0]);
    let y_domain = zero_baseline(ys.iter().flatten().copied());

    let (width, height, m) = (config.width, config.height, config.margin);
    let x_range = config.x_range.unwrap_or([m.left, width - m.right]);
    let y_range = config.y_range.unwrap_or([height - m.bottom, m.top]);
    let x_scale = ContinuousScale::new(config.x_type, x_domain, x_range).nice(15.0);
    let y_scale = ContinuousScale::new(config.y_type, y_domain, y_range);

    let points = xs.iter().zip(&ys).map(|(xv, yv)| xv.zip(*yv).map(|(xv, yv)| (x_scale.map(xv), y_scale.map(yv))));
    let commands = segmented_path(points);
    let path = PathMark { commands, style: config.line.to_style() };
    debug!(points = data.len(), segments = path.subpath_count(), "line chart");

    let mut scene = Scene::new(width, height);

    let x_axis = Axis::bottom(ticks(&x_scale, width / 40.0), x_range, height - m.bottom)
        .tick_size_outer(0.0)
        .title(AxisTitle::italic(&config.x_label, width / 2.0 - m.left / 2.0, m.bottom, TextAnchor::Start));
    scene.push(x_axis.to_primitive());

    let y_axis = Axis::left(ticks(&y_scale, height / 40.0), y_range, m.left)
        .without_domain()
        .grid(width - m.left - m.right)
        .title(AxisTitle::italic(&config.y_label, -m.left, 10.0, TextAnchor::Start));
    scene.push(y_axis.to_primitive());

    scene.push(path);
    Ok(scene)
}
