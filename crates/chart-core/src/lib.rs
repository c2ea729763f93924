// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports scales, hierarchy/treemap layout, color binding and chart builders.

pub mod error;
pub mod value;
pub mod types;
pub mod geometry;
pub mod format;
pub mod scale;
pub mod axis;
pub mod color;
pub mod hierarchy;
pub mod treemap;
pub mod scene;
pub mod svg;
pub mod charts;

pub use error::{ChartError, Result};
pub use value::{field, Record, Value};
pub use types::{Insets, ScaleType, HEIGHT, WIDTH};
pub use geometry::{Point, Rect};
pub use scale::{BandScale, ContinuousScale, LinearScale, TimeScale};
pub use axis::{Axis, Tick, TickSource};
pub use color::{palette, Color, ColorMap};
pub use hierarchy::{from_flat, from_nested, Group, HierarchyNode, LeafPath, Nested};
pub use treemap::{Tiling, TreemapLayout, TreemapPadding};
pub use scene::{GroupMark, PathCommand, PathMark, Primitive, RectMark, Scene, TextMark};
pub use charts::{
    grouped_bar_chart, legend, line_chart, treemap_chart, ColoredScene, GroupedBarConfig, LegendConfig, LineConfig,
    LineStyle, TreemapConfig,
};
