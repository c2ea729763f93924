// File: crates/chart-core/src/scale.rs
// Summary: Linear, UTC time and band scales mapping data domains to pixel ranges.

use std::hash::Hash;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use indexmap::IndexSet;
use tracing::warn;

use crate::geometry::clamp;
use crate::types::ScaleType;

/// Ordered, de-duplicated categorical domain (first-seen order).
pub type Domain<V> = IndexSet<V>;

/// Collect values into a domain, keeping the first occurrence of each.
pub fn domain_of<V: Hash + Eq>(values: impl IntoIterator<Item = V>) -> Domain<V> {
    values.into_iter().collect()
}

/// `[0, max(values)]`, the zero-baseline domain used for counts.
/// Negative-only data yields an inverted domain; empty data yields `[0, 0]`.
pub fn zero_baseline(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    let max = values.into_iter().filter(|v| !v.is_nan()).fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() { [0.0, max] } else { [0.0, 0.0] }
}

/// `[min, max]` of the non-NaN values, `None` when there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<[f64; 2]> {
    values.into_iter().filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

// ---- tick math ---------------------------------------------------------------

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Returns `(i1, i2, inc)`; a negative `inc` means ticks are `i / -inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let k = 10f64.powf(-power) / factor;
        i1 = (start * k).round();
        i2 = (stop * k).round();
        if i1 / k < start { i1 += 1.0; }
        if i2 / k > stop { i2 -= 1.0; }
        inc = -k;
    } else {
        let k = 10f64.powf(power) * factor;
        i1 = (start / k).round();
        i2 = (stop / k).round();
        if i1 * k < start { i1 += 1.0; }
        if i2 * k > stop { i2 -= 1.0; }
        inc = k;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// "Nice" tick values (1, 2 or 5 times a power of ten) covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse { tick_spec(stop, start, count) } else { tick_spec(start, stop, count) };
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    (0..n)
        .map(|i| {
            let k = if reverse { i2 - i as f64 } else { i1 + i as f64 };
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect()
}

/// Signed increment used by `nice`; negative values are inverse steps.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Distance between adjacent ticks, negative when `stop < start`.
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse { tick_increment(stop, start, count) } else { tick_increment(start, stop, count) };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

// ---- linear -----------------------------------------------------------------

/// Linear map from `[d0, d1]` to `[r0, r1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] { self.domain }
    pub fn range(&self) -> [f64; 2] { self.range }

    /// Zero-span domains map everything to the middle of the range.
    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) * 0.5;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 || !span.is_finite() {
            return (d0 + d1) * 0.5;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }

    pub fn ticks(&self, count: f64) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count)
    }

    /// Label formatter matching the precision of `ticks(count)`.
    pub fn tick_format(&self, count: f64) -> impl Fn(f64) -> String {
        crate::format::step_formatter(tick_step(self.domain[0], self.domain[1], count))
    }

    /// Extend the domain outward to round tick values.
    pub fn nice(mut self, count: f64) -> Self {
        let [d0, d1] = self.domain;
        let reverse = d1 < d0;
        let (mut start, mut stop) = if reverse { (d1, d0) } else { (d0, d1) };
        if start == stop || !start.is_finite() || !stop.is_finite() {
            return self;
        }
        let mut prestep = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = step;
        }
        self.domain = if reverse { [stop, start] } else { [start, stop] };
        self
    }
}

// ---- time -------------------------------------------------------------------

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn approx_millis(self) -> i64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => SECOND,
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => HOUR,
            TimeUnit::Day => DAY,
            TimeUnit::Week => WEEK,
            TimeUnit::Month => MONTH,
            TimeUnit::Year => YEAR,
        }
    }
}

/// Calendar interval such as "every 3 months".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: i64,
}

/// Most instants a single [`TimeInterval::range`] call returns.
pub const MAX_TIME_TICKS: usize = 10_000;

const TICK_INTERVALS: [(TimeUnit, i64); 17] = [
    (TimeUnit::Second, 1),
    (TimeUnit::Second, 5),
    (TimeUnit::Second, 15),
    (TimeUnit::Second, 30),
    (TimeUnit::Minute, 1),
    (TimeUnit::Minute, 5),
    (TimeUnit::Minute, 15),
    (TimeUnit::Minute, 30),
    (TimeUnit::Hour, 1),
    (TimeUnit::Hour, 3),
    (TimeUnit::Hour, 6),
    (TimeUnit::Hour, 12),
    (TimeUnit::Day, 1),
    (TimeUnit::Day, 2),
    (TimeUnit::Week, 1),
    (TimeUnit::Month, 1),
    (TimeUnit::Month, 3),
];

fn month_index(ms: i64) -> i64 {
    let d = utc(ms);
    d.year() as i64 * 12 + d.month0() as i64
}

fn utc(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn month_start(index: i64) -> i64 {
    let year = index.div_euclid(12) as i32;
    let month = index.rem_euclid(12) as u32 + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .map_or(i64::MIN, |d| d.timestamp_millis())
}

impl TimeInterval {
    pub const fn new(unit: TimeUnit, step: i64) -> Self {
        Self { unit, step }
    }

    fn fixed_millis(&self) -> Option<i64> {
        match self.unit {
            TimeUnit::Millisecond | TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour | TimeUnit::Day => {
                Some(self.unit.approx_millis() * self.step.max(1))
            }
            _ => None,
        }
    }

    /// Latest interval boundary at or before `ms`.
    pub fn floor(&self, ms: i64) -> i64 {
        let step = self.step.max(1);
        if let Some(span) = self.fixed_millis() {
            return ms - ms.rem_euclid(span);
        }
        match self.unit {
            TimeUnit::Week => {
                // 1970-01-04 was a Sunday
                let day = ms.div_euclid(DAY);
                let sunday = day - (day - 3).rem_euclid(7);
                let weeks_from_epoch = (sunday - 3).div_euclid(7);
                (sunday - weeks_from_epoch.rem_euclid(step) * 7) * DAY
            }
            TimeUnit::Month => {
                let m = month_index(ms);
                month_start(m - m.rem_euclid(step))
            }
            _ => {
                let y = utc(ms).year() as i64;
                month_start((y - y.rem_euclid(step)) * 12)
            }
        }
    }

    /// Boundary `k` intervals after the boundary `ms`.
    pub fn offset(&self, ms: i64, k: i64) -> i64 {
        let step = self.step.max(1);
        if let Some(span) = self.fixed_millis() {
            return ms + span * k;
        }
        match self.unit {
            TimeUnit::Week => ms + WEEK * step * k,
            TimeUnit::Month => month_start(month_index(ms) + step * k),
            _ => month_start(month_index(ms) + 12 * step * k),
        }
    }

    /// Earliest boundary at or after `ms`.
    pub fn ceil(&self, ms: i64) -> i64 {
        let f = self.floor(ms);
        if f < ms { self.offset(f, 1) } else { f }
    }

    /// Boundaries in `[start, stop]`.
    pub fn range(&self, start: i64, stop: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut t = self.ceil(start);
        while t <= stop {
            if out.len() == MAX_TIME_TICKS {
                warn!(interval = ?self, limit = MAX_TIME_TICKS, "time range truncated");
                break;
            }
            out.push(t);
            let next = self.offset(t, 1);
            if next <= t { break; }
            t = next;
        }
        out
    }
}

/// Interval whose spacing best matches `count` ticks over `[start, stop]`.
pub fn tick_interval(start: i64, stop: i64, count: f64) -> TimeInterval {
    let target = (stop as f64 - start as f64).abs() / count.max(1e-9);
    let i = TICK_INTERVALS.partition_point(|(u, s)| ((u.approx_millis() * s) as f64) <= target);
    if i == TICK_INTERVALS.len() {
        let step = tick_step(start as f64 / YEAR as f64, stop as f64 / YEAR as f64, count).abs();
        return TimeInterval::new(TimeUnit::Year, (step.round() as i64).max(1));
    }
    if i == 0 {
        let step = tick_step(start as f64, stop as f64, count).abs();
        return TimeInterval::new(TimeUnit::Millisecond, (step.round() as i64).max(1));
    }
    let (lu, ls) = TICK_INTERVALS[i - 1];
    let (hu, hs) = TICK_INTERVALS[i];
    let lower = (lu.approx_millis() * ls) as f64;
    let upper = (hu.approx_millis() * hs) as f64;
    if target / lower < upper / target {
        TimeInterval::new(lu, ls)
    } else {
        TimeInterval::new(hu, hs)
    }
}

/// Label a tick by the coarsest calendar unit it falls on.
pub fn format_time_tick(ms: i64) -> String {
    let d = utc(ms);
    let at = |unit: TimeUnit| TimeInterval::new(unit, 1).floor(ms) == ms;
    let fmt = if !at(TimeUnit::Second) {
        ".%3f"
    } else if !at(TimeUnit::Minute) {
        ":%S"
    } else if !at(TimeUnit::Hour) {
        "%I:%M"
    } else if !at(TimeUnit::Day) {
        "%I %p"
    } else if !at(TimeUnit::Month) {
        if !at(TimeUnit::Week) { "%a %d" } else { "%b %d" }
    } else if !at(TimeUnit::Year) {
        "%B"
    } else {
        "%Y"
    };
    d.format(fmt).to_string()
}

/// UTC time scale; the domain is held in epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: [DateTime<Utc>; 2], range: [f64; 2]) -> Self {
        Self::from_millis([domain[0].timestamp_millis() as f64, domain[1].timestamp_millis() as f64], range)
    }

    pub fn from_millis(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { linear: LinearScale::new(domain, range) }
    }

    pub fn domain_millis(&self) -> [f64; 2] { self.linear.domain() }
    pub fn range(&self) -> [f64; 2] { self.linear.range() }

    pub fn map(&self, t: DateTime<Utc>) -> f64 {
        self.linear.map(t.timestamp_millis() as f64)
    }

    #[inline]
    pub fn map_millis(&self, ms: f64) -> f64 {
        self.linear.map(ms)
    }

    pub fn invert(&self, px: f64) -> DateTime<Utc> {
        utc(self.linear.invert(px).round() as i64)
    }

    fn bounds(&self) -> (i64, i64, bool) {
        let [d0, d1] = self.linear.domain();
        // Instants chrono cannot represent have no calendar.
        let lo = DateTime::<Utc>::MIN_UTC.timestamp_millis() as f64;
        let hi = DateTime::<Utc>::MAX_UTC.timestamp_millis() as f64;
        let (a, b) = (clamp(d0.round(), lo, hi) as i64, clamp(d1.round(), lo, hi) as i64);
        if b < a { (b, a, true) } else { (a, b, false) }
    }

    /// Extend the domain to calendar boundaries of the tick interval.
    pub fn nice(self, count: f64) -> Self {
        let (start, stop, reverse) = self.bounds();
        if start == stop {
            return self;
        }
        let interval = tick_interval(start, stop, count);
        let (lo, hi) = (interval.floor(start) as f64, interval.ceil(stop) as f64);
        if hi <= lo {
            return self;
        }
        let domain = if reverse { [hi, lo] } else { [lo, hi] };
        Self::from_millis(domain, self.linear.range())
    }

    /// Tick instants in epoch milliseconds.
    pub fn ticks(&self, count: f64) -> Vec<i64> {
        let (start, stop, reverse) = self.bounds();
        if !(count > 0.0) {
            return Vec::new();
        }
        let limit = (MAX_TIME_TICKS / 2) as f64;
        if count > limit {
            warn!(count, limit, "time tick count clamped");
        }
        let mut out = tick_interval(start, stop, count.min(limit)).range(start, stop);
        if reverse { out.reverse(); }
        out
    }
}

/// Continuous scale picked by [`ScaleType`]; values are plain numbers
/// (epoch milliseconds for time).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContinuousScale {
    Linear(LinearScale),
    Time(TimeScale),
}

impl ContinuousScale {
    pub fn new(kind: ScaleType, domain: [f64; 2], range: [f64; 2]) -> Self {
        match kind {
            ScaleType::Linear => ContinuousScale::Linear(LinearScale::new(domain, range)),
            ScaleType::Time => ContinuousScale::Time(TimeScale::from_millis(domain, range)),
        }
    }

    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        match self {
            ContinuousScale::Linear(s) => s.map(v),
            ContinuousScale::Time(s) => s.map_millis(v),
        }
    }

    pub fn nice(self, count: f64) -> Self {
        match self {
            ContinuousScale::Linear(s) => ContinuousScale::Linear(s.nice(count)),
            ContinuousScale::Time(s) => ContinuousScale::Time(s.nice(count)),
        }
    }

    pub fn range(&self) -> [f64; 2] {
        match self {
            ContinuousScale::Linear(s) => s.range(),
            ContinuousScale::Time(s) => s.range(),
        }
    }
}

// ---- band -------------------------------------------------------------------

/// Ordinal scale giving each category an equal-width band.
#[derive(Clone, Debug)]
pub struct BandScale<V: Hash + Eq> {
    domain: Domain<V>,
    range: [f64; 2],
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<V: Hash + Eq> BandScale<V> {
    pub fn new(domain: impl IntoIterator<Item = V>, range: [f64; 2]) -> Self {
        let mut s = Self {
            domain: domain.into_iter().collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        s.rescale();
        s
    }

    /// Fraction of each step left empty between bands, in `[0, 1]`.
    pub fn padding_inner(mut self, p: f64) -> Self {
        self.padding_inner = clamp(p, 0.0, 1.0);
        self.rescale();
        self
    }

    /// Space before the first and after the last band, in steps.
    pub fn padding_outer(mut self, p: f64) -> Self {
        self.padding_outer = p.max(0.0);
        self.rescale();
        self
    }

    /// Same value for inner and outer padding.
    pub fn padding(self, p: f64) -> Self {
        self.padding_inner(p).padding_outer(p)
    }

    pub fn align(mut self, a: f64) -> Self {
        self.align = clamp(a, 0.0, 1.0);
        self.rescale();
        self
    }

    /// Snap step, start and bandwidth to whole pixels.
    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let [r0, r1] = self.range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let mut step = (hi - lo) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut start = lo + (hi - lo - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }
        self.start = start;
        self.step = step;
        self.bandwidth = if self.domain.is_empty() { 0.0 } else { bandwidth };
    }

    pub fn domain(&self) -> &Domain<V> { &self.domain }
    pub fn range(&self) -> [f64; 2] { self.range }
    pub fn bandwidth(&self) -> f64 { self.bandwidth }
    pub fn step(&self) -> f64 { self.step }

    /// Start of the band at domain index `i`.
    pub fn position_at(&self, i: usize) -> Option<f64> {
        let n = self.domain.len();
        if i >= n {
            return None;
        }
        let slot = if self.range[1] < self.range[0] { n - 1 - i } else { i };
        Some(self.start + self.step * slot as f64)
    }

    /// Start of the band for `v`, `None` when `v` is not in the domain.
    pub fn position(&self, v: &V) -> Option<f64> {
        self.domain.get_index_of(v).and_then(|i| self.position_at(i))
    }

    pub fn center(&self, v: &V) -> Option<f64> {
        self.position(v).map(|p| p + self.bandwidth * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_spec_picks_decimal_steps() {
        assert_eq!(ticks(0.0, 10.0, 10.0), (0..=10).map(f64::from).collect::<Vec<_>>());
        assert_eq!(ticks(0.0, 1.0, 5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(0.0, 100.0, 4.0), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn reversed_ticks_descend() {
        assert_eq!(ticks(10.0, 0.0, 5.0), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn nice_rounds_outward() {
        let s = LinearScale::new([0.5, 97.3], [0.0, 100.0]).nice(10.0);
        assert_eq!(s.domain(), [0.0, 100.0]);
    }

    #[test]
    fn week_floor_lands_on_sunday() {
        // 2024-03-06 (Wednesday) 12:00
        let ms = Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap().timestamp_millis();
        let floored = utc(TimeInterval::new(TimeUnit::Week, 1).floor(ms));
        assert_eq!(floored.weekday(), chrono::Weekday::Sun);
        assert_eq!(floored.day(), 3);
    }

    #[test]
    fn huge_tick_counts_still_cover_the_domain() {
        let s = TimeScale::from_millis([0.0, 1e12], [0.0, 600.0]);
        let t = s.ticks(1e9);
        assert!(t.len() <= MAX_TIME_TICKS);
        assert_eq!(t.first(), Some(&0));
        assert!(t.last().is_some_and(|&last| last >= 1_000_000_000_000 - 2 * DAY));
    }

    #[test]
    fn range_stops_at_the_tick_limit() {
        let every_ms = TimeInterval::new(TimeUnit::Millisecond, 1);
        assert_eq!(every_ms.range(0, 1_000_000).len(), MAX_TIME_TICKS);
    }

    #[test]
    fn unrepresentable_instants_clamp_to_the_calendar() {
        let s = TimeScale::from_millis([-1e19, 1e19], [0.0, 600.0]);
        let t = s.ticks(10.0);
        assert!(!t.is_empty());
        assert!(t.windows(2).all(|w| w[0] < w[1]));
        let n = s.nice(10.0);
        assert!(n.domain_millis().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn month_offsets_cross_years() {
        let nov = month_start(2023 * 12 + 10);
        let iv = TimeInterval::new(TimeUnit::Month, 3);
        assert_eq!(utc(iv.offset(nov, 1)).year(), 2024);
        assert_eq!(utc(iv.offset(nov, 1)).month(), 2);
    }
}
