// File: crates/chart-core/src/treemap.rs
// Summary: Treemap layout: recursive area-proportional partition with padding, rounding and pluggable tiling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Rect;
use crate::hierarchy::HierarchyNode;

/// `(1 + sqrt(5)) / 2`, the default target aspect ratio for squarified rows.
pub const GOLDEN_RATIO: f64 = 1.618033988749895;

/// How a node's rectangle is split among its children.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tiling {
    /// Rows/columns chosen to keep aspect ratios near `ratio`.
    Squarify { ratio: f64 },
    /// Recursive bisection by cumulative value; split along the longer side.
    Binary,
    /// Side by side, left to right.
    Dice,
    /// Stacked, top to bottom.
    Slice,
    /// Slice at odd depths, dice at even depths.
    SliceDice,
}

impl Default for Tiling {
    fn default() -> Self {
        Tiling::Squarify { ratio: GOLDEN_RATIO }
    }
}

/// Padding in pixels. `inner` separates siblings; the sides separate a
/// parent's border from its children.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TreemapPadding {
    pub inner: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl TreemapPadding {
    pub const fn uniform(p: f64) -> Self {
        Self { inner: p, top: p, right: p, bottom: p, left: p }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreemapLayout {
    pub width: f64,
    pub height: f64,
    pub padding: TreemapPadding,
    pub tiling: Tiling,
    /// Snap all edges to whole pixels after positioning.
    pub round: bool,
}

impl TreemapLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, padding: TreemapPadding::default(), tiling: Tiling::default(), round: true }
    }

    pub fn padding(mut self, padding: TreemapPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn tiling(mut self, tiling: Tiling) -> Self {
        self.tiling = tiling;
        self
    }

    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Assign `rect` to every node of `root`. Values must already be
    /// aggregated (see [`HierarchyNode::sum`]).
    pub fn layout<D>(&self, root: &mut HierarchyNode<D>) {
        debug!(width = self.width, height = self.height, tiling = ?self.tiling, total = root.value, "treemap layout");
        root.rect = Rect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0));
        self.position(root, 0.0);
        if self.round {
            round_all(root);
        }
    }

    /// Shrink `node` by the half inner padding `p` its parent reserved, then
    /// tile its children inside its own side padding.
    fn position<D>(&self, node: &mut HierarchyNode<D>, p: f64) {
        let Rect { x0, y0, x1, y1 } = node.rect;
        node.rect = collapse(Rect::new(x0 + p, y0 + p, x1 - p, y1 - p));
        if node.children.is_empty() {
            return;
        }
        let half = self.padding.inner / 2.0;
        let r = node.rect;
        let inner = collapse(Rect::new(
            r.x0 + self.padding.left - half,
            r.y0 + self.padding.top - half,
            r.x1 - self.padding.right + half,
            r.y1 - self.padding.bottom + half,
        ));
        let value = node.value;
        let depth = node.depth;
        tile(self.tiling, &mut node.children, value, depth, inner);
        for child in &mut node.children {
            self.position(child, half);
        }
    }
}

/// Inverted extents collapse to their midpoint.
fn collapse(mut r: Rect) -> Rect {
    if r.x1 < r.x0 {
        let m = (r.x0 + r.x1) / 2.0;
        r.x0 = m;
        r.x1 = m;
    }
    if r.y1 < r.y0 {
        let m = (r.y0 + r.y1) / 2.0;
        r.y0 = m;
        r.y1 = m;
    }
    r
}

fn round_all<D>(node: &mut HierarchyNode<D>) {
    node.rect = node.rect.round();
    for c in &mut node.children {
        round_all(c);
    }
}

/// Split `rect` among `nodes` whose values sum to `value`.
pub fn tile<D>(tiling: Tiling, nodes: &mut [HierarchyNode<D>], value: f64, depth: usize, rect: Rect) {
    if !(value > 0.0) {
        let corner = Rect::new(rect.x0, rect.y0, rect.x0, rect.y0);
        for n in nodes {
            n.rect = corner;
        }
        return;
    }
    match tiling {
        Tiling::Squarify { ratio } => squarify(nodes, value, rect, ratio),
        Tiling::Binary => binary(nodes, value, rect),
        Tiling::Dice => dice(nodes, value, rect),
        Tiling::Slice => slice(nodes, value, rect),
        Tiling::SliceDice if depth % 2 == 1 => slice(nodes, value, rect),
        Tiling::SliceDice => dice(nodes, value, rect),
    }
}

fn dice<D>(nodes: &mut [HierarchyNode<D>], value: f64, r: Rect) {
    let k = if value > 0.0 { (r.x1 - r.x0) / value } else { 0.0 };
    let mut x = r.x0;
    for n in nodes {
        let x0 = x;
        x += n.value * k;
        n.rect = Rect::new(x0, r.y0, x, r.y1);
    }
}

fn slice<D>(nodes: &mut [HierarchyNode<D>], value: f64, r: Rect) {
    let k = if value > 0.0 { (r.y1 - r.y0) / value } else { 0.0 };
    let mut y = r.y0;
    for n in nodes {
        let y0 = y;
        y += n.value * k;
        n.rect = Rect::new(r.x0, y0, r.x1, y);
    }
}

fn squarify<D>(nodes: &mut [HierarchyNode<D>], mut value: f64, rect: Rect, ratio: f64) {
    let Rect { mut x0, mut y0, x1, y1 } = rect;
    let n = nodes.len();
    let (mut i0, mut i1) = (0usize, 0usize);
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Start the row at the next non-empty node.
        let mut sum_value;
        loop {
            sum_value = nodes[i1].value;
            i1 += 1;
            if sum_value != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (value * ratio);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        // Grow the row while the worst aspect ratio improves.
        while i1 < n {
            let node_value = nodes[i1].value;
            sum_value += node_value;
            min_value = min_value.min(node_value);
            max_value = max_value.max(node_value);
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= node_value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &mut nodes[i0..i1];
        if dx < dy {
            let y = if value > 0.0 { y0 + dy * sum_value / value } else { y1 };
            dice(row, sum_value, Rect::new(x0, y0, x1, y));
            if value > 0.0 {
                y0 = y;
            }
        } else {
            let x = if value > 0.0 { x0 + dx * sum_value / value } else { x1 };
            slice(row, sum_value, Rect::new(x0, y0, x, y1));
            if value > 0.0 {
                x0 = x;
            }
        }
        value -= sum_value;
        i0 = i1;
    }
}

fn binary<D>(nodes: &mut [HierarchyNode<D>], value: f64, rect: Rect) {
    if nodes.is_empty() {
        return;
    }
    let mut sums = Vec::with_capacity(nodes.len() + 1);
    let mut acc = 0.0;
    sums.push(acc);
    for n in nodes.iter() {
        acc += n.value;
        sums.push(acc);
    }
    let len = nodes.len();
    partition(nodes, &sums, 0, len, value, rect);
}

fn partition<D>(nodes: &mut [HierarchyNode<D>], sums: &[f64], i: usize, j: usize, value: f64, r: Rect) {
    if i + 1 >= j {
        nodes[i].rect = r;
        return;
    }

    let value_offset = sums[i];
    let value_target = value / 2.0 + value_offset;
    let mut k = i + 1;
    let mut hi = j - 1;
    while k < hi {
        let mid = (k + hi) / 2;
        if sums[mid] < value_target {
            k = mid + 1;
        } else {
            hi = mid;
        }
    }
    if value_target - sums[k - 1] < sums[k] - value_target && i + 1 < k {
        k -= 1;
    }

    let value_left = sums[k] - value_offset;
    let value_right = value - value_left;
    if r.width() > r.height() {
        let xk = if value > 0.0 { (r.x0 * value_right + r.x1 * value_left) / value } else { r.x1 };
        partition(nodes, sums, i, k, value_left, Rect::new(r.x0, r.y0, xk, r.y1));
        partition(nodes, sums, k, j, value_right, Rect::new(xk, r.y0, r.x1, r.y1));
    } else {
        let yk = if value > 0.0 { (r.y0 * value_right + r.y1 * value_left) / value } else { r.y1 };
        partition(nodes, sums, i, k, value_left, Rect::new(r.x0, r.y0, r.x1, yk));
        partition(nodes, sums, k, j, value_right, Rect::new(r.x0, yk, r.x1, r.y1));
    }
}
