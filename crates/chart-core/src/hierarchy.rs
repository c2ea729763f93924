// File: crates/chart-core/src/hierarchy.rs
// Summary: Owned tree of aggregatable nodes; grouping of flat records, nested input, value roll-up and traversal.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::value::Value;

/// Tree node carrying caller data, an aggregated `value` and layout geometry.
/// The parent owns its children; the same node is updated by `sum` and by
/// the treemap layout.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode<D> {
    pub data: D,
    pub children: Vec<HierarchyNode<D>>,
    pub value: f64,
    /// Distance from the root (root is 0).
    pub depth: usize,
    /// Set by [`crate::treemap::TreemapLayout::layout`].
    pub rect: Rect,
}

/// A leaf together with its ancestor chain.
#[derive(Clone, Debug)]
pub struct LeafPath<'a, D> {
    pub node: &'a HierarchyNode<D>,
    /// Root first, parent last.
    pub ancestors: Vec<&'a HierarchyNode<D>>,
}

impl<'a, D> LeafPath<'a, D> {
    /// Node on this path at `depth`; the leaf itself at its own depth.
    pub fn at_depth(&self, depth: usize) -> Option<&'a HierarchyNode<D>> {
        if depth == self.node.depth {
            Some(self.node)
        } else {
            self.ancestors.get(depth).copied()
        }
    }

    pub fn parent(&self) -> Option<&'a HierarchyNode<D>> {
        self.ancestors.last().copied()
    }
}

impl<D> HierarchyNode<D> {
    pub fn leaf(data: D) -> Self {
        Self { data, children: Vec::new(), value: 0.0, depth: 0, rect: Rect::default() }
    }

    /// Internal node; depths below it are renumbered from 0.
    pub fn new(data: D, children: Vec<HierarchyNode<D>>) -> Self {
        let mut node = Self { data, children, value: 0.0, depth: 0, rect: Rect::default() };
        node.set_depth(0);
        node
    }

    fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        for c in &mut self.children {
            c.set_depth(depth + 1);
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaf value = `max(0, value(data))` (NaN counts as 0); internal value =
    /// sum of children. Runs bottom-up over the whole subtree.
    pub fn sum(&mut self, value: impl Fn(&D) -> f64) -> &mut Self {
        self.sum_with(&value);
        self
    }

    fn sum_with(&mut self, value: &dyn Fn(&D) -> f64) -> f64 {
        self.value = if self.children.is_empty() {
            let v = value(&self.data);
            if v > 0.0 { v } else { 0.0 }
        } else {
            self.children.iter_mut().map(|c| c.sum_with(value)).sum()
        };
        self.value
    }

    /// Every leaf counts 1; internal nodes count their leaves.
    pub fn count(&mut self) -> &mut Self {
        self.sum(|_| 1.0)
    }

    /// Reorder every child list; only runs when the caller asks for it.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&Self, &Self) -> Ordering) -> &mut Self {
        self.sort_with(&mut compare);
        self
    }

    fn sort_with(&mut self, compare: &mut dyn FnMut(&Self, &Self) -> Ordering) {
        self.children.sort_by(|a, b| compare(a, b));
        for c in &mut self.children {
            c.sort_with(compare);
        }
    }

    /// Pre-order list of this node and everything below it.
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(n.children.iter().rev());
        }
        out
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&Self> {
        self.descendants().into_iter().filter(|n| n.is_leaf()).collect()
    }

    /// Leaves in order, each with its ancestors.
    pub fn leaf_paths(&self) -> Vec<LeafPath<'_, D>> {
        fn walk<'a, D>(n: &'a HierarchyNode<D>, trail: &mut Vec<&'a HierarchyNode<D>>, out: &mut Vec<LeafPath<'a, D>>) {
            if n.is_leaf() {
                out.push(LeafPath { node: n, ancestors: trail.clone() });
                return;
            }
            trail.push(n);
            for c in &n.children {
                walk(c, trail, out);
            }
            trail.pop();
        }
        let mut out = Vec::new();
        walk(self, &mut Vec::new(), &mut out);
        out
    }

    /// Longest distance to a leaf.
    pub fn height(&self) -> usize {
        self.children.iter().map(|c| c.height() + 1).max().unwrap_or(0)
    }
}

/// Node data produced by [`from_flat`]: the grouping key (none at the root)
/// and, for leaves, the records of that group.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<'a, T> {
    pub key: Option<Value>,
    pub members: Vec<&'a T>,
}

/// Group `records` by each key function in turn, one tree level per key,
/// children in first-seen key order.
pub fn from_flat<'a, T>(records: &'a [T], keys: &[&dyn Fn(&T) -> Value]) -> HierarchyNode<Group<'a, T>> {
    fn level<'a, T>(key: Option<Value>, members: Vec<&'a T>, keys: &[&dyn Fn(&T) -> Value]) -> HierarchyNode<Group<'a, T>> {
        let Some((first, rest)) = keys.split_first() else {
            return HierarchyNode::leaf(Group { key, members });
        };
        let mut buckets: IndexMap<Value, Vec<&'a T>> = IndexMap::new();
        for m in members {
            buckets.entry(first(m)).or_default().push(m);
        }
        let children = buckets.into_iter().map(|(k, ms)| level(Some(k), ms, rest)).collect();
        HierarchyNode { data: Group { key, members: Vec::new() }, children, value: 0.0, depth: 0, rect: Rect::default() }
    }
    let mut root = level(None, records.iter().collect(), keys);
    root.set_depth(0);
    root
}

/// Nested `{name, size, children}` input ("flare.json" shape).
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Nested {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Nested>,
}

impl Nested {
    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        Self { name: name.into(), size: Some(size), children: Vec::new() }
    }
    pub fn branch(name: impl Into<String>, children: Vec<Nested>) -> Self {
        Self { name: name.into(), size: None, children }
    }
}

/// Node data of a tree built from [`Nested`] input.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Datum {
    pub name: String,
    pub size: Option<f64>,
}

/// Convert nested input into a hierarchy; empty child lists make leaves.
pub fn from_nested(root: Nested) -> HierarchyNode<Datum> {
    fn convert(n: Nested) -> HierarchyNode<Datum> {
        let data = Datum { name: n.name, size: n.size };
        let children = n.children.into_iter().map(convert).collect();
        HierarchyNode { data, children, value: 0.0, depth: 0, rect: Rect::default() }
    }
    let mut node = convert(root);
    node.set_depth(0);
    node
}
