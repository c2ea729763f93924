// File: crates/chart-core/src/charts/treemap.rs
// Summary: Treemap chart: aggregate, bind leaf groups to colors, lay out, then emit a rect and clipped label per leaf.

use tracing::debug;

use super::{check_size, ColoredScene};
use crate::color::{palette, Color, ColorMap};
use crate::error::{ChartError, Result};
use crate::geometry::Rect;
use crate::hierarchy::{HierarchyNode, LeafPath};
use crate::scale::domain_of;
use crate::scene::{Font, GroupMark, Paint, RectMark, Scene, Style, TextMark};
use crate::treemap::{Tiling, TreemapLayout, TreemapPadding};
use crate::types::{Insets, HEIGHT, WIDTH};
use crate::value::Value;

const FONT_SIZE: f64 = 10.0;
const UNGROUPED_FILL: Color = Color::hex(0xcccccc);

pub struct TreemapConfig<D> {
    /// Area of a leaf. Required; negatives clamp to zero.
    pub value: Option<Box<dyn Fn(&D) -> f64>>,
    /// Label of a leaf; `\n` separates lines.
    pub label: Option<Box<dyn Fn(&D, &LeafPath<D>) -> String>>,
    /// Category of a leaf, used for its color.
    pub group: Option<Box<dyn Fn(&D, &LeafPath<D>) -> Value>>,
    pub width: f64,
    pub height: f64,
    pub margin: Insets,
    pub padding: TreemapPadding,
    pub tiling: Tiling,
    pub colors: Vec<Color>,
    pub fill_opacity: f64,
}

impl<D> Default for TreemapConfig<D> {
    fn default() -> Self {
        Self {
            value: None,
            label: None,
            group: None,
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            padding: TreemapPadding::uniform(1.0),
            tiling: Tiling::Binary,
            colors: palette::TABLEAU10.to_vec(),
            fill_opacity: 0.6,
        }
    }
}

impl<D> TreemapConfig<D> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn value(mut self, f: impl Fn(&D) -> f64 + 'static) -> Self {
        self.value = Some(Box::new(f));
        self
    }
    pub fn label(mut self, f: impl Fn(&D, &LeafPath<D>) -> String + 'static) -> Self {
        self.label = Some(Box::new(f));
        self
    }
    pub fn group(mut self, f: impl Fn(&D, &LeafPath<D>) -> Value + 'static) -> Self {
        self.group = Some(Box::new(f));
        self
    }
}

/// Lays out `root` in place (values and rects stay on the nodes) and draws its leaves.
pub fn treemap_chart<D>(root: &mut HierarchyNode<D>, config: &TreemapConfig<D>) -> Result<ColoredScene> {
    let value = config.value.as_deref().ok_or(ChartError::MissingExtractor("value"))?;
    check_size(config.width, config.height)?;
    let m = config.margin;

    root.sum(value);

    // Groups and labels read the aggregated values, before geometry exists.
    let (groups, labels): (Vec<Option<Value>>, Vec<Option<String>>) = root
        .leaf_paths()
        .iter()
        .map(|p| {
            let g = config.group.as_ref().map(|f| f(&p.node.data, p));
            let l = config.label.as_ref().map(|f| f(&p.node.data, p));
            (g, l)
        })
        .unzip();
    let colors = ColorMap::new(domain_of(groups.iter().flatten().cloned()), &config.colors)?;

    TreemapLayout::new(config.width - m.hsum(), config.height - m.vsum())
        .padding(config.padding)
        .tiling(config.tiling)
        .round(true)
        .layout(root);
    debug!(leaves = groups.len(), groups = colors.len(), total = root.value, "treemap chart");

    let mut scene = Scene::new(config.width, config.height);
    scene.view_box = [-m.left, -m.top, config.width, config.height];
    scene.font = Font::sans_serif(FONT_SIZE);

    for ((leaf, group), label) in root.leaves().into_iter().zip(&groups).zip(&labels) {
        let r = leaf.rect;
        let fill = group.as_ref().and_then(|g| colors.get(g)).unwrap_or(UNGROUPED_FILL);
        let mut cell = GroupMark::translated(r.x0, r.y0);
        cell.push(RectMark {
            x: 0.0,
            y: 0.0,
            width: r.width(),
            height: r.height(),
            style: Style::fill(Paint::Color(fill)).with_fill_opacity(config.fill_opacity),
        });
        if let Some(label) = label {
            cell.push(label_lines(label, r.width(), r.height()));
        }
        scene.push(cell);
    }

    Ok(ColoredScene { scene, colors })
}

/// One text per line, clipped to the cell; the last line sits a little lower and fainter.
fn label_lines(label: &str, width: f64, height: f64) -> GroupMark {
    let mut text = GroupMark { clip: Some(Rect::new(0.0, 0.0, width, height)), ..GroupMark::default() };
    let lines: Vec<&str> = label.split('\n').collect();
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let em = (if i == last { 0.3 } else { 0.0 }) + 1.1 + i as f64 * 0.9;
        let mut t = TextMark::new(3.0, em * FONT_SIZE, *line);
        if i == last {
            t.style.fill_opacity = Some(0.7);
        }
        text.push(t);
    }
    text
}
