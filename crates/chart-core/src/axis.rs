// File: crates/chart-core/src/axis.rs
// Summary: Tick generation for every scale kind and axis primitives (domain line, tick marks, labels, grid, title).

use std::fmt::Display;
use std::hash::Hash;

use serde::Serialize;

use crate::scale::{format_time_tick, BandScale, ContinuousScale, LinearScale, TimeScale};
use crate::scene::{
    Font, FontStyle, FontWeight, GroupMark, Paint, PathCommand, PathMark, Primitive, Style, TextAnchor, TextMark,
};

/// Tick at a pixel position along an axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Scales that can produce ticks for an axis.
pub trait TickSource {
    /// About `count` ticks; band scales ignore the count and return one per entry.
    fn ticks(&self, count: f64) -> Vec<Tick>;
}

/// Ticks for `scale`, approximately `target` of them for continuous scales.
pub fn ticks<S: TickSource + ?Sized>(scale: &S, target: f64) -> Vec<Tick> {
    scale.ticks(target)
}

impl TickSource for LinearScale {
    fn ticks(&self, count: f64) -> Vec<Tick> {
        let fmt = self.tick_format(count);
        linear_ticks_with(self, count, &fmt)
    }
}

/// Linear ticks with a caller-supplied label format.
pub fn linear_ticks_with(scale: &LinearScale, count: f64, format: &dyn Fn(f64) -> String) -> Vec<Tick> {
    LinearScale::ticks(scale, count)
        .into_iter()
        .map(|v| Tick { position: scale.map(v), label: format(v) })
        .collect()
}

impl TickSource for TimeScale {
    fn ticks(&self, count: f64) -> Vec<Tick> {
        TimeScale::ticks(self, count)
            .into_iter()
            .map(|ms| Tick { position: self.map_millis(ms as f64), label: format_time_tick(ms) })
            .collect()
    }
}

impl TickSource for ContinuousScale {
    fn ticks(&self, count: f64) -> Vec<Tick> {
        match self {
            ContinuousScale::Linear(s) => TickSource::ticks(s, count),
            ContinuousScale::Time(s) => TickSource::ticks(s, count),
        }
    }
}

impl<V: Hash + Eq + Display> TickSource for BandScale<V> {
    fn ticks(&self, _count: f64) -> Vec<Tick> {
        band_ticks(self, None, None)
    }
}

/// Band ticks at band centres. `values` picks a subset/order of the domain
/// (unknown values are dropped), `format` overrides the string form.
pub fn band_ticks<V: Hash + Eq + Display>(
    scale: &BandScale<V>,
    values: Option<&[V]>,
    format: Option<&dyn Fn(&V) -> String>,
) -> Vec<Tick> {
    let label = |v: &V| format.map_or_else(|| v.to_string(), |f| f(v));
    let tick = |v: &V| scale.center(v).map(|position| Tick { position, label: label(v) });
    match values {
        Some(vs) => vs.iter().filter_map(tick).collect(),
        None => scale.domain().iter().filter_map(tick).collect(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

/// Title text attached to an axis group, in the group's coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTitle {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl AxisTitle {
    pub fn italic(text: impl Into<String>, x: f64, y: f64, anchor: TextAnchor) -> Self {
        Self { text: text.into(), x, y, anchor, weight: FontWeight::Normal, style: FontStyle::Italic }
    }
    pub fn bold(text: impl Into<String>, x: f64, y: f64, anchor: TextAnchor) -> Self {
        Self { text: text.into(), x, y, anchor, weight: FontWeight::Bold, style: FontStyle::Normal }
    }
}

/// Axis layout, turned into a translated group of primitives by [`Axis::to_primitive`].
#[derive(Clone, Debug)]
pub struct Axis {
    pub orient: Orient,
    pub ticks: Vec<Tick>,
    /// Pixel extent of the scale along the axis.
    pub range: [f64; 2],
    /// Cross-axis offset: `y` of a bottom axis, `x` of a left axis.
    pub offset: f64,
    pub tick_size_inner: f64,
    pub tick_size_outer: f64,
    pub tick_padding: f64,
    pub domain_line: bool,
    /// Length of faint grid lines drawn from each tick across the plot.
    pub grid: Option<f64>,
    pub title: Option<AxisTitle>,
}

impl Axis {
    fn new(orient: Orient, ticks: Vec<Tick>, range: [f64; 2], offset: f64) -> Self {
        Self {
            orient,
            ticks,
            range,
            offset,
            tick_size_inner: 6.0,
            tick_size_outer: 6.0,
            tick_padding: 3.0,
            domain_line: true,
            grid: None,
            title: None,
        }
    }

    pub fn bottom(ticks: Vec<Tick>, range: [f64; 2], y: f64) -> Self {
        Self::new(Orient::Bottom, ticks, range, y)
    }

    pub fn left(ticks: Vec<Tick>, range: [f64; 2], x: f64) -> Self {
        Self::new(Orient::Left, ticks, range, x)
    }

    /// Sets inner and outer tick size together.
    pub fn tick_size(mut self, size: f64) -> Self {
        self.tick_size_inner = size;
        self.tick_size_outer = size;
        self
    }

    pub fn tick_size_outer(mut self, size: f64) -> Self {
        self.tick_size_outer = size;
        self
    }

    pub fn without_domain(mut self) -> Self {
        self.domain_line = false;
        self
    }

    pub fn grid(mut self, length: f64) -> Self {
        self.grid = Some(length);
        self
    }

    pub fn title(mut self, title: AxisTitle) -> Self {
        self.title = Some(title);
        self
    }

    pub fn to_primitive(&self) -> Primitive {
        const FONT_SIZE: f64 = 10.0;
        let (k, translate) = match self.orient {
            Orient::Bottom => (1.0, (0.0, self.offset)),
            Orient::Left => (-1.0, (self.offset, 0.0)),
        };
        let mut g = GroupMark::translated(translate.0, translate.1);
        g.font = Font::sans_serif(FONT_SIZE);
        g.style = Style::fill(Paint::None);

        if self.domain_line {
            let outer = k * self.tick_size_outer;
            let [r0, r1] = self.range;
            let commands = match self.orient {
                Orient::Bottom => vec![
                    PathCommand::MoveTo { x: r0, y: outer },
                    PathCommand::VerticalTo { y: 0.0 },
                    PathCommand::HorizontalTo { x: r1 },
                    PathCommand::VerticalTo { y: outer },
                ],
                Orient::Left => vec![
                    PathCommand::MoveTo { x: outer, y: r0 },
                    PathCommand::HorizontalTo { x: 0.0 },
                    PathCommand::VerticalTo { y: r1 },
                    PathCommand::HorizontalTo { x: outer },
                ],
            };
            g.push(PathMark { commands, style: Style::stroke(Paint::CurrentColor) });
        }

        let inner = k * self.tick_size_inner;
        let spacing = self.tick_size_inner.max(0.0) + self.tick_padding;
        for t in &self.ticks {
            let p = t.position;
            let (line_end, label) = match self.orient {
                Orient::Bottom => (
                    PathCommand::VerticalTo { y: inner },
                    TextMark::new(p, spacing + 0.71 * FONT_SIZE, &t.label).anchor(TextAnchor::Middle),
                ),
                Orient::Left => (
                    PathCommand::HorizontalTo { x: inner },
                    TextMark::new(-spacing, p + 0.32 * FONT_SIZE, &t.label).anchor(TextAnchor::End),
                ),
            };
            let start = match self.orient {
                Orient::Bottom => PathCommand::MoveTo { x: p, y: 0.0 },
                Orient::Left => PathCommand::MoveTo { x: 0.0, y: p },
            };
            g.push(PathMark { commands: vec![start, line_end], style: Style::stroke(Paint::CurrentColor) });
            if let Some(len) = self.grid {
                let across = match self.orient {
                    Orient::Bottom => PathCommand::VerticalTo { y: -len },
                    Orient::Left => PathCommand::HorizontalTo { x: len },
                };
                g.push(PathMark {
                    commands: vec![start, across],
                    style: Style::stroke(Paint::CurrentColor).with_stroke_opacity(0.1),
                });
            }
            let mut label = label;
            label.style = Style::fill(Paint::CurrentColor);
            g.push(label);
        }

        if let Some(title) = &self.title {
            let mut text = TextMark::new(title.x, title.y, &title.text).anchor(title.anchor);
            text.font.weight = Some(title.weight);
            text.font.style = Some(title.style);
            text.style = Style::fill(Paint::CurrentColor);
            g.push(text);
        }
        Primitive::Group(g)
    }
}
