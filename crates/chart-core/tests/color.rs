// File: crates/chart-core/tests/color.rs
// Purpose: Color parsing/printing and positional palette assignment.

use chart_core::{palette, ChartError, Color, ColorMap, Value};

#[test]
fn parses_and_prints_hex() {
    let c: Color = "#4e79a7".parse().unwrap();
    assert_eq!(c, Color::hex(0x4e79a7));
    assert_eq!(c.to_string(), "#4e79a7");
    assert_eq!("#abc".parse::<Color>().unwrap(), Color::hex(0xaabbcc));
    assert_eq!("#ff000080".parse::<Color>().unwrap().to_string(), "#ff000080");
    assert!("4e79a7".parse::<Color>().is_err());
    assert!("#12345".parse::<Color>().is_err());
}

#[test]
fn colors_wrap_around_the_palette() {
    let two = [Color::hex(0x111111), Color::hex(0x222222)];
    let map = ColorMap::new(["a", "b", "c"], &two).unwrap();
    assert_eq!(map.get(&"a"), Some(two[0]));
    assert_eq!(map.get(&"b"), Some(two[1]));
    assert_eq!(map.get(&"c"), Some(two[0]));
    assert_eq!(map.get(&"d"), None);
    assert_eq!(map.palette(), &two[..]);
}

#[test]
fn same_domain_order_same_colors() {
    let domain = || ["x", "y", "x", "z"].map(Value::text);
    let a = ColorMap::new(domain(), &palette::TABLEAU10).unwrap();
    let b = ColorMap::new(domain(), &palette::TABLEAU10).unwrap();
    assert_eq!(a.len(), 3);
    let ea: Vec<(Value, Color)> = a.entries().map(|(v, c)| (v.clone(), c)).collect();
    let eb: Vec<(Value, Color)> = b.entries().map(|(v, c)| (v.clone(), c)).collect();
    assert_eq!(ea, eb);
    assert_eq!(ea[2], (Value::text("z"), palette::TABLEAU10[2]));
}

#[test]
fn empty_palette_is_an_error() {
    assert!(matches!(ColorMap::new(["a"], &[]), Err(ChartError::EmptyPalette)));
}

#[test]
fn color_map_serializes_as_pairs() {
    let map = ColorMap::new(["a"], &palette::SET1).unwrap();
    assert_eq!(serde_json::to_string(&map).unwrap(), r##"[["a","#e41a1c"]]"##);
}
