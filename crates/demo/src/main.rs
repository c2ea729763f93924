// File: crates/demo/src/main.rs
// Summary: Demo loads the NTSB incident CSV and writes three figures (grouped bars, yearly line, state treemap) plus legends as SVG/JSON.

mod incidents;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chart_core::color::{palette, Color};
use chart_core::{
    grouped_bar_chart, legend, line_chart, treemap_chart, GroupedBarConfig, LegendConfig, LineConfig, Scene, Tiling,
    TreemapConfig, Value,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::incidents::{injuries, injury_label, load_csv, makes_by_total, per_year, state_model_tree, INJURY_TYPES};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incident_charts=info,chart_core=info".into()),
        )
        .init();

    // Accept path from CLI or fall back to the bundled sample (supports .csv/.cvs swap)
    let raw = std::env::args().nth(1).unwrap_or_else(|| "crates/demo/data/aircraft_incidents.csv".to_string());
    let (path, used_alt) = resolve_path(&raw)?;
    info!(path = %path.display(), swapped_extension = used_alt, "using input file");

    let rows = load_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    info!(rows = rows.len(), "loaded incidents");
    if rows.is_empty() {
        anyhow::bail!("no incidents loaded; check headers/delimiter.");
    }

    // 1) Injury severity per manufacturer
    let data = injuries(&rows);
    let makes: Vec<Value> = makes_by_total(&data).into_iter().map(Value::from).collect();
    let mut bars = GroupedBarConfig::new()
        .x(|d: &incidents::InjuryCount| Value::text(d.make.as_str()))
        .y(|d| Value::Number(d.passengers))
        .z(|d| Value::text(d.kind))
        .x_domain(makes)
        .z_domain(INJURY_TYPES.iter().map(|t| Value::text(*t)).collect());
    bars.y_label = "Passengers".into();
    bars.x_label = "Aircraft Manufacturer".into();
    let injuries_chart = grouped_bar_chart(&data, &bars)?;
    write_scene(&injuries_chart.scene, "injuries")?;

    let mut key = LegendConfig::new()
        .title("Injury Severity")
        .width(320.0)
        .tick_size(0.0)
        .tick_format(|v: &Value| injury_label(v.as_str().unwrap_or_default()).to_string());
    key.tick_values = Some(INJURY_TYPES.iter().map(|t| Value::text(*t)).collect());
    write_scene(&legend(&injuries_chart.colors, &key), "injuries_legend")?;

    // 2) Incidents per year
    let years = per_year(&rows);
    write_scene(&line_chart(&years, &per_year_config())?, "per_year")?;

    // 3) Incidents per state and model
    let mut tree = state_model_tree(&rows);
    let mut treemap = TreemapConfig::new()
        .value(|d: &chart_core::hierarchy::Datum| d.size.unwrap_or(0.0))
        .group(|_, path| path.at_depth(1).map(|n| Value::text(n.data.name.as_str())).unwrap_or_default())
        .label(|d, path| format!("{}\n{}", d.name, chart_core::format::format_grouped(path.node.value, 0)));
    treemap.width = 1280.0;
    treemap.height = 800.0;
    treemap.tiling = Tiling::default();
    treemap.colors = palette::concat(&[&palette::SET1[..], &palette::SET2[..], &palette::SET3[..]]);
    let states = treemap_chart(&mut tree, &treemap)?;
    write_scene(&states.scene, "per_state")?;
    write_scene(&legend(&states.colors, &LegendConfig::new().title("State").width(1280.0)), "per_state_legend")?;

    Ok(())
}

fn per_year_config() -> LineConfig<incidents::YearTotal> {
    let mut line = LineConfig::new()
        .x(|d: &incidents::YearTotal| Value::Date(d.year))
        .y(|d| Value::Number(d.total));
    line.x_label = "Year".into();
    line.y_label = "Aircraft Incidents".into();
    line.line.color = Some(Color::hex(0x87ceeb));
    line
}

/// Write `<name>.svg` and `<name>.json` under target/out.
fn write_scene(scene: &Scene, name: &str) -> Result<()> {
    let out = out_dir()?;
    let svg = out.join(format!("{name}.svg"));
    std::fs::write(&svg, scene.to_svg()).with_context(|| format!("writing {}", svg.display()))?;
    let json = out.join(format!("{name}.json"));
    std::fs::write(&json, scene.to_json()?).with_context(|| format!("writing {}", json.display()))?;
    info!(svg = %svg.display(), primitives = scene.primitives.len(), "wrote figure");
    Ok(())
}

fn out_dir() -> Result<PathBuf> {
    let out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    Ok(out)
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::incidents::YearTotal;

    #[test]
    fn per_year_axes_are_titled() {
        let years: Vec<YearTotal> = [(2008, 3.0), (2009, 5.0)]
            .into_iter()
            .map(|(y, total)| YearTotal { year: Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap(), total })
            .collect();
        let scene = line_chart(&years, &per_year_config()).unwrap();
        let texts: Vec<&str> = scene.texts().iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"Year"));
        assert!(texts.contains(&"Aircraft Incidents"));
    }
}
