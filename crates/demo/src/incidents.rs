// File: crates/demo/src/incidents.rs
// Summary: NTSB incident CSV loading and the three per-figure derivations (injuries, yearly counts, state/model tree).

use std::path::Path;

use anyhow::{Context, Result};
use chart_core::{HierarchyNode, Nested};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

/// One CSV row; only the columns the figures use are read.
#[derive(Debug, Clone, Deserialize)]
pub struct Incident {
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Event_Date")]
    pub event_date: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Make")]
    pub make: Option<String>,
    #[serde(rename = "Model")]
    pub model: Option<String>,
    #[serde(rename = "Total_Fatal_Injuries", deserialize_with = "csv::invalid_option")]
    pub fatal: Option<f64>,
    #[serde(rename = "Total_Serious_Injuries", deserialize_with = "csv::invalid_option")]
    pub serious: Option<f64>,
    #[serde(rename = "Total_Uninjured", deserialize_with = "csv::invalid_option")]
    pub uninjured: Option<f64>,
}

pub fn load_csv(path: &Path) -> Result<Vec<Incident>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<Incident>().enumerate() {
        let rec = rec.with_context(|| format!("reading row {} of {}", i + 1, path.display()))?;
        out.push(rec);
    }
    Ok(out)
}

/// Injury column names, also the series domain of the grouped bar chart.
pub const INJURY_TYPES: [&str; 3] = ["Total_Fatal_Injuries", "Total_Serious_Injuries", "Total_Uninjured"];

pub fn injury_label(kind: &str) -> &'static str {
    match kind {
        "Total_Fatal_Injuries" => "Fatal",
        "Total_Serious_Injuries" => "Serious",
        _ => "Uninjured",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InjuryCount {
    pub make: String,
    pub kind: &'static str,
    pub passengers: f64,
}

/// One row per (injury type, incident), type-major; rows missing the make or
/// the count are dropped.
pub fn injuries(rows: &[Incident]) -> Vec<InjuryCount> {
    INJURY_TYPES
        .iter()
        .flat_map(|&kind| {
            rows.iter().filter_map(move |r| {
                let passengers = match kind {
                    "Total_Fatal_Injuries" => r.fatal,
                    "Total_Serious_Injuries" => r.serious,
                    _ => r.uninjured,
                }?;
                Some(InjuryCount { make: r.make.clone()?, kind, passengers })
            })
        })
        .collect()
}

/// Manufacturers ordered by total passengers, largest first; ties keep first-seen order.
pub fn makes_by_total(data: &[InjuryCount]) -> Vec<String> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for d in data {
        *totals.entry(d.make.as_str()).or_default() += d.passengers;
    }
    let mut makes: Vec<(&str, f64)> = totals.into_iter().collect();
    makes.sort_by(|a, b| b.1.total_cmp(&a.1));
    makes.into_iter().map(|(m, _)| m.to_string()).collect()
}

/// Dates appear as ISO `YYYY-MM-DD`, US `MM/DD/YYYY` or full timestamps.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%y"]
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearTotal {
    /// January 1st of the year, UTC.
    pub year: DateTime<Utc>,
    pub total: f64,
}

/// Incident counts per calendar year, in chronological order.
pub fn per_year(rows: &[Incident]) -> Vec<YearTotal> {
    let mut dates: Vec<DateTime<Utc>> = Vec::with_capacity(rows.len());
    let mut unparsed = 0usize;
    for r in rows {
        match r.event_date.as_deref().and_then(parse_date) {
            Some(d) => dates.push(d),
            None => unparsed += 1,
        }
    }
    if unparsed > 0 {
        warn!(unparsed, "rows without a readable Event_Date were left out of the yearly counts");
    }
    dates.sort();

    let mut counts: IndexMap<i32, f64> = IndexMap::new();
    for d in &dates {
        *counts.entry(chrono::Datelike::year(d)).or_default() += 1.0;
    }
    counts
        .into_iter()
        .filter_map(|(y, total)| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).single().map(|year| YearTotal { year, total }))
        .collect()
}

/// `state -> " Make\nModel" -> count` for US incidents with a location.
/// The state is the last word of the location.
pub fn state_model_tree(rows: &[Incident]) -> HierarchyNode<chart_core::hierarchy::Datum> {
    let mut counts: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
    for r in rows {
        if r.country.as_deref() != Some("United States") {
            continue;
        }
        let Some(state) = r.location.as_deref().and_then(|l| l.split(' ').last()) else { continue };
        let model = format!(
            " {}\n{}",
            r.make.as_deref().unwrap_or_default(),
            r.model.as_deref().unwrap_or_default()
        );
        *counts.entry(state.to_string()).or_default().entry(model).or_default() += 1.0;
    }
    debug!(states = counts.len(), "state/model rollup");

    let children = counts
        .into_iter()
        .map(|(state, models)| Nested::branch(state, models.into_iter().map(|(m, n)| Nested::leaf(m, n)).collect()))
        .collect();
    chart_core::from_nested(Nested::branch("state", children))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(make: &str, date: &str, location: &str, counts: [Option<f64>; 3]) -> Incident {
        Incident {
            country: Some("United States".into()),
            event_date: Some(date.into()),
            location: Some(location.into()),
            make: Some(make.into()),
            model: Some("X1".into()),
            fatal: counts[0],
            serious: counts[1],
            uninjured: counts[2],
        }
    }

    #[test]
    fn injuries_flatten_type_major_and_drop_missing() {
        let rows = vec![
            incident("Boeing", "2001-01-02", "Seattle, WA", [Some(0.0), None, Some(10.0)]),
            incident("Airbus", "2002-01-02", "Dallas, TX", [Some(2.0), Some(1.0), Some(3.0)]),
        ];
        let data = injuries(&rows);
        assert_eq!(data.len(), 5);
        assert_eq!(data[0].kind, "Total_Fatal_Injuries");
        assert_eq!(data[2].make, "Airbus");
        assert_eq!(data[2].kind, "Total_Serious_Injuries");
        assert_eq!(makes_by_total(&data), ["Boeing", "Airbus"]);
    }

    #[test]
    fn dates_in_several_shapes() {
        let want = Utc.with_ymd_and_hms(2009, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2009-01-15"), Some(want));
        assert_eq!(parse_date("01/15/2009"), Some(want));
        assert_eq!(parse_date("2009-01-15T00:00:00Z"), Some(want));
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn yearly_counts_are_chronological() {
        let rows = vec![
            incident("A", "2005-06-01", "x, CA", [None; 3]),
            incident("A", "1999-06-01", "x, CA", [None; 3]),
            incident("A", "2005-01-01", "x, CA", [None; 3]),
        ];
        let years: Vec<(i32, f64)> =
            per_year(&rows).iter().map(|y| (chrono::Datelike::year(&y.year), y.total)).collect();
        assert_eq!(years, [(1999, 1.0), (2005, 2.0)]);
    }

    #[test]
    fn tree_groups_by_state_then_model() {
        let rows = vec![
            incident("Boeing", "2001-01-02", "Seattle, WA", [None; 3]),
            incident("Boeing", "2001-01-02", "Spokane, WA", [None; 3]),
            incident("Airbus", "2001-01-02", "Dallas, TX", [None; 3]),
        ];
        let root = state_model_tree(&rows);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].data.name, "WA");
        assert_eq!(root.children[0].children[0].data.name, " Boeing\nX1");
        assert_eq!(root.children[0].children[0].data.size, Some(2.0));
    }
}
