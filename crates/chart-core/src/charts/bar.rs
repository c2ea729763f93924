// File: crates/chart-core/src/charts/bar.rs
// Summary: Grouped bar chart: x bands, nested z sub-bands, zero-based y and a shared z color map.

use tracing::{debug, warn};

use super::{check_size, require, ColoredScene, Extractor};
use crate::axis::{band_ticks, ticks, Axis, AxisTitle};
use crate::color::{palette, Color, ColorMap};
use crate::error::Result;
use crate::scale::{domain_of, zero_baseline, BandScale, ContinuousScale, Domain};
use crate::scene::{GroupMark, RectMark, Scene, Style, TextAnchor};
use crate::types::{Insets, ScaleType, HEIGHT, WIDTH};
use crate::value::Value;

pub struct GroupedBarConfig<T> {
    /// Ordinal x value (the group). Required.
    pub x: Option<Extractor<T>>,
    /// Quantitative bar height. Required; non-numeric values are not drawn.
    pub y: Option<Extractor<T>>,
    /// Categorical series within a group; a single series when absent.
    pub z: Option<Extractor<T>>,
    pub width: f64,
    pub height: f64,
    pub margin: Insets,
    /// Fixes x category order; inferred from the data when `None`.
    pub x_domain: Option<Vec<Value>>,
    pub x_range: Option<[f64; 2]>,
    /// Fraction of each x step left between groups.
    pub x_padding: f64,
    pub y_type: ScaleType,
    pub y_range: Option<[f64; 2]>,
    pub z_domain: Option<Vec<Value>>,
    /// Padding of the sub-bands inside a group.
    pub z_padding: f64,
    pub x_label: String,
    pub y_label: String,
    pub colors: Vec<Color>,
}

impl<T> Default for GroupedBarConfig<T> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::new(40.0, 0.0, 30.0, 30.0),
            x_domain: None,
            x_range: None,
            x_padding: 0.1,
            y_type: ScaleType::Linear,
            y_range: None,
            z_domain: None,
            z_padding: 0.05,
            x_label: String::new(),
            y_label: String::new(),
            colors: palette::TABLEAU10.to_vec(),
        }
    }
}

impl<T> GroupedBarConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn x(mut self, f: impl Fn(&T) -> Value + 'static) -> Self {
        self.x = Some(Box::new(f));
        self
    }
    pub fn y(mut self, f: impl Fn(&T) -> Value + 'static) -> Self {
        self.y = Some(Box::new(f));
        self
    }
    pub fn z(mut self, f: impl Fn(&T) -> Value + 'static) -> Self {
        self.z = Some(Box::new(f));
        self
    }
    pub fn x_domain(mut self, domain: Vec<Value>) -> Self {
        self.x_domain = Some(domain);
        self
    }
    pub fn z_domain(mut self, domain: Vec<Value>) -> Self {
        self.z_domain = Some(domain);
        self
    }
}

/// One rect per record at `(x(x) + z(z), y(y))`, `z.bandwidth` wide and
/// reaching down to `y(0)`. Records whose x or z falls outside the domains,
/// or whose y is not numeric, are left out and reported.
pub fn grouped_bar_chart<T>(data: &[T], config: &GroupedBarConfig<T>) -> Result<ColoredScene> {
    let x = require(&config.x, "x")?;
    let y = require(&config.y, "y")?;
    check_size(config.width, config.height)?;

    let xs: Vec<Value> = data.iter().map(x).collect();
    let ys: Vec<Option<f64>> = data.iter().map(|d| y(d).as_f64()).collect();
    let zs: Vec<Value> = match &config.z {
        Some(z) => data.iter().map(z).collect(),
        None => vec![Value::Number(1.0); data.len()],
    };

    let x_domain: Domain<Value> = match &config.x_domain {
        Some(d) => domain_of(d.iter().cloned()),
        None => domain_of(xs.iter().cloned()),
    };
    let z_domain: Domain<Value> = match &config.z_domain {
        Some(d) => domain_of(d.iter().cloned()),
        None => domain_of(zs.iter().cloned()),
    };
    let y_domain = zero_baseline(ys.iter().flatten().copied());

    let (width, height, m) = (config.width, config.height, config.margin);
    let x_range = config.x_range.unwrap_or([m.left, width - m.right]);
    let y_range = config.y_range.unwrap_or([height - m.bottom, m.top]);

    let x_scale = BandScale::new(x_domain, x_range).padding_inner(config.x_padding);
    let xz_scale = BandScale::new(z_domain.iter().cloned(), [0.0, x_scale.bandwidth()]).padding(config.z_padding);
    let y_scale = ContinuousScale::new(config.y_type, y_domain, y_range);
    let colors = ColorMap::new(z_domain, &config.colors)?;
    debug!(
        records = data.len(),
        groups = x_scale.domain().len(),
        series = colors.len(),
        y_max = y_domain[1],
        "grouped bar chart"
    );

    let mut scene = Scene::new(width, height);

    let y_axis = Axis::left(ticks(&y_scale, height / 60.0), y_range, m.left)
        .without_domain()
        .grid(width - m.left - m.right)
        .title(AxisTitle::italic(&config.y_label, -m.left, 10.0, TextAnchor::Start));
    scene.push(y_axis.to_primitive());

    let mut bars = GroupMark::default();
    let base = y_scale.map(0.0);
    let mut skipped = 0usize;
    for ((xv, zv), yv) in xs.iter().zip(&zs).zip(&ys) {
        let placed = x_scale.position(xv).zip(xz_scale.position(zv)).zip(colors.get(zv)).zip(*yv);
        let Some((((xp, zp), color), yv)) = placed else {
            skipped += 1;
            continue;
        };
        let top = y_scale.map(yv);
        bars.push(RectMark {
            x: xp + zp,
            y: top.min(base),
            width: xz_scale.bandwidth(),
            height: (base - top).abs(),
            style: Style::fill(color),
        });
    }
    if skipped > 0 {
        warn!(skipped, "grouped bar chart: records outside the x/z domains or without a numeric y were not drawn");
    }
    scene.push(bars);

    let x_axis = Axis::bottom(band_ticks(&x_scale, None, None), x_range, height - m.bottom)
        .tick_size_outer(0.0)
        .title(AxisTitle::italic(&config.x_label, width / 2.0 + m.left / 2.0, m.bottom, TextAnchor::Middle));
    scene.push(x_axis.to_primitive());

    Ok(ColoredScene { scene, colors })
}
