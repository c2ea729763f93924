// File: crates/chart-examples/src/bin/lines.rs
// Summary: Minimal example that builds a gapped line chart from inline data and writes it as SVG.

use chart_core::{line_chart, LineConfig, ScaleType, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // (x, y); the missing y breaks the line in two
    let data = vec![
        (0.0, Some(0.0)),
        (1.0, Some(1.2)),
        (2.0, Some(0.8)),
        (3.0, None),
        (4.0, Some(1.4)),
        (5.0, Some(2.0)),
    ];

    let mut config = LineConfig::new()
        .x(|d: &(f64, Option<f64>)| Value::Number(d.0))
        .y(|d| Value::from(d.1));
    config.x_type = ScaleType::Linear;
    config.x_label = "X".into();
    config.y_label = "Y".into();

    let scene = line_chart(&data, &config)?;
    let out = std::path::PathBuf::from("target/out/example_lines.svg");
    if let Some(dir) = out.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&out, scene.to_svg())?;
    println!("Wrote {}", out.display());
    Ok(())
}
