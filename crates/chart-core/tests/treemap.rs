// File: crates/chart-core/tests/treemap.rs
// Purpose: Hierarchy aggregation and treemap geometry (areas, containment, padding, degenerate values).

use chart_core::hierarchy::Datum;
use chart_core::{from_flat, from_nested, HierarchyNode, Nested, Rect, Tiling, TreemapLayout, TreemapPadding, Value};

fn sizes(values: &[f64]) -> HierarchyNode<Datum> {
    let leaves = values.iter().enumerate().map(|(i, v)| Nested::leaf(format!("n{i}"), *v)).collect();
    let mut root = from_nested(Nested::branch("root", leaves));
    root.sum(|d| d.size.unwrap_or(0.0));
    root
}

fn flare() -> HierarchyNode<Datum> {
    let mut root = from_nested(Nested::branch(
        "flare",
        vec![
            Nested::branch("analytics", vec![Nested::leaf("cluster", 3938.0), Nested::leaf("graph", 3534.0)]),
            Nested::branch(
                "animate",
                vec![Nested::leaf("Easing", 17010.0), Nested::leaf("FunctionSequence", 5842.0), Nested::leaf("Tween", 6006.0)],
            ),
            Nested::leaf("flex", 4116.0),
            Nested::branch("empty", vec![Nested::leaf("nothing", 0.0)]),
        ],
    ));
    root.sum(|d| d.size.unwrap_or(0.0));
    root
}

struct Row {
    state: &'static str,
    model: &'static str,
}

fn assert_disjoint(rects: &[Rect]) {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn sum_rolls_up_and_clamps_negatives() {
    let root = sizes(&[10.0, -5.0, 20.0, f64::NAN]);
    let values: Vec<f64> = root.children.iter().map(|c| c.value).collect();
    assert_eq!(values, [10.0, 0.0, 20.0, 0.0]);
    assert_eq!(root.value, 30.0);

    let flare = flare();
    assert_eq!(flare.children[0].value, 3938.0 + 3534.0);
    assert_eq!(flare.value, 3938.0 + 3534.0 + 17010.0 + 5842.0 + 6006.0 + 4116.0);
    assert_eq!(flare.height(), 2);
    assert_eq!(flare.leaves().len(), 7);
}

#[test]
fn from_flat_groups_by_each_key_in_first_seen_order() {
    let rows = [
        Row { state: "CA", model: "737" },
        Row { state: "TX", model: "A320" },
        Row { state: "CA", model: "A320" },
        Row { state: "CA", model: "737" },
    ];
    let state = |r: &Row| Value::text(r.state);
    let model = |r: &Row| Value::text(r.model);
    let keys: [&dyn Fn(&Row) -> Value; 2] = [&state, &model];
    let mut root = from_flat(&rows, &keys);
    root.sum(|g| g.members.len() as f64);

    assert_eq!(root.depth, 0);
    assert_eq!(root.value, 4.0);
    let keys: Vec<Option<Value>> = root.children.iter().map(|c| c.data.key.clone()).collect();
    assert_eq!(keys, [Some(Value::text("CA")), Some(Value::text("TX"))]);

    let ca = &root.children[0];
    assert_eq!(ca.value, 3.0);
    assert_eq!(ca.children[0].data.key, Some(Value::text("737")));
    assert_eq!(ca.children[0].data.members.len(), 2);
    assert_eq!(ca.children[0].depth, 2);

    let paths = root.leaf_paths();
    assert_eq!(paths.len(), 3);
    let tx = &paths[2];
    assert_eq!(tx.at_depth(1).and_then(|n| n.data.key.clone()), Some(Value::text("TX")));
    assert_eq!(tx.parent().map(|n| n.depth), Some(1));

    // Counting leaves sees one per (state, model) group.
    root.count();
    assert_eq!(root.value, 3.0);
    assert_eq!(root.children[0].value, 2.0);
}

#[test]
fn sort_by_reorders_every_level() {
    let mut root = flare();
    root.sort_by(|a, b| b.value.total_cmp(&a.value));
    assert_eq!(root.children[0].data.name, "animate");
    assert_eq!(root.children[0].children[0].data.name, "Easing");
    assert_eq!(root.children.last().map(|c| c.data.name.as_str()), Some("empty"));
}

#[test]
fn dice_areas_are_proportional() {
    let mut root = sizes(&[10.0, 20.0, 30.0]);
    TreemapLayout::new(600.0, 100.0).tiling(Tiling::Dice).round(false).layout(&mut root);
    let widths: Vec<f64> = root.children.iter().map(|c| c.rect.width()).collect();
    assert_eq!(widths, [100.0, 200.0, 300.0]);
    assert!(root.children.iter().all(|c| c.rect.height() == 100.0));
}

#[test]
fn binary_splits_by_cumulative_value() {
    let mut root = sizes(&[10.0, 20.0, 30.0]);
    TreemapLayout::new(600.0, 100.0).tiling(Tiling::Binary).round(false).layout(&mut root);
    let r: Vec<Rect> = root.children.iter().map(|c| c.rect).collect();
    assert_eq!(r[0], Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(r[1], Rect::new(100.0, 0.0, 300.0, 100.0));
    assert_eq!(r[2], Rect::new(300.0, 0.0, 600.0, 100.0));
}

#[test]
fn every_tiling_fills_the_root_without_overlap() {
    let tilings = [Tiling::default(), Tiling::Binary, Tiling::Dice, Tiling::Slice, Tiling::SliceDice];
    for tiling in tilings {
        let mut root = flare();
        TreemapLayout::new(960.0, 600.0).tiling(tiling).round(false).layout(&mut root);
        assert_eq!(root.rect.area(), 960.0 * 600.0);

        let leaves: Vec<Rect> = root.leaves().iter().map(|n| n.rect).collect();
        assert_disjoint(&leaves);
        let covered: f64 = leaves.iter().map(Rect::area).sum();
        assert!((covered - 960.0 * 600.0).abs() < 1e-6, "{tiling:?}: {covered}");

        for leaf in root.leaves() {
            let expected = leaf.value / root.value * 960.0 * 600.0;
            assert!((leaf.rect.area() - expected).abs() < 1e-6, "{tiling:?}: {} vs {expected}", leaf.rect.area());
            assert!(leaf.rect.x0 >= -1e-9 && leaf.rect.x1 <= 960.0 + 1e-9);
            assert!(leaf.rect.y0 >= -1e-9 && leaf.rect.y1 <= 600.0 + 1e-9);
        }
    }
}

#[test]
fn zero_values_get_zero_area() {
    let mut root = sizes(&[0.0, 10.0, 0.0]);
    TreemapLayout::new(100.0, 100.0).round(false).layout(&mut root);
    assert_eq!(root.children[0].rect.area(), 0.0);
    assert_eq!(root.children[1].rect.area(), 100.0 * 100.0);
    assert_eq!(root.children[2].rect.area(), 0.0);

    let mut nothing = sizes(&[0.0, 0.0]);
    TreemapLayout::new(100.0, 100.0).tiling(Tiling::Binary).layout(&mut nothing);
    assert!(nothing.children.iter().all(|c| c.rect.area() == 0.0));
}

#[test]
fn padding_separates_siblings_and_rounding_keeps_them_apart() {
    let mut root = flare();
    root.children.retain(|c| c.value > 0.0);
    TreemapLayout::new(960.0, 600.0).padding(TreemapPadding::uniform(1.0)).tiling(Tiling::Binary).layout(&mut root);

    let inner = Rect::new(1.0, 1.0, 959.0, 599.0);
    let leaves: Vec<Rect> = root.leaves().iter().map(|n| n.rect).collect();
    assert_disjoint(&leaves);
    for r in &leaves {
        assert!(inner.contains(r), "{r:?} escapes the padded root");
        assert_eq!(r.x0, r.x0.round());
        assert_eq!(r.y1, r.y1.round());
    }
    for parent in root.descendants().into_iter().filter(|n| !n.is_leaf()) {
        for child in &parent.children {
            assert!(parent.rect.contains(&child.rect));
        }
    }
}

#[test]
fn single_leaf_takes_the_whole_area() {
    let mut root = HierarchyNode::leaf(5.0_f64);
    root.sum(|v| *v);
    TreemapLayout::new(320.0, 200.0).layout(&mut root);
    assert_eq!(root.rect, Rect::new(0.0, 0.0, 320.0, 200.0));
}

#[test]
fn squarified_square_keeps_ten_twenty_thirty() {
    let mut root = sizes(&[10.0, 20.0, 30.0]);
    TreemapLayout::new(100.0, 100.0).round(false).layout(&mut root);
    let areas: Vec<f64> = root.children.iter().map(|c| c.rect.area()).collect();
    let total: f64 = areas.iter().sum();
    assert!((total - 10_000.0).abs() < 1e-6);
    for (area, v) in areas.iter().zip([10.0, 20.0, 30.0]) {
        assert!((area / total - v / 60.0).abs() < 1e-9);
    }
}
