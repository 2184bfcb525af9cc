// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Remarkable points of an equation-of-time series.
//!
//! [`extract`] walks the series once and reports:
//!
//! | Kind | Rule |
//! |------|------|
//! | [`FeatureKind::Max`] | global maximum, first occurrence wins ties |
//! | [`FeatureKind::Min`] | global minimum, first occurrence wins ties |
//! | [`FeatureKind::Inflection`] | interior day `j` with `(v[j-1] - v[j]) * (v[j] - v[j+1]) < 0` |
//! | [`FeatureKind::ZeroCrossing`] | day `j` with `v[j-1] * v[j] < 0` |
//!
//! "Inflection" here means a change of sign of the discrete first
//! difference, i.e. a local extremum of the sampled curve, not a change of
//! curvature. A zero-crossing is reported on the first day carrying the new
//! sign; a value of exactly zero never counts as a crossing.

use qtty::Minutes;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::calendar::{CalendarDate, DayIndex};
use crate::series::EotSeries;

/// Category of a remarkable point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Max,
    Min,
    Inflection,
    ZeroCrossing,
}

impl FeatureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Max => "max",
            FeatureKind::Min => "min",
            FeatureKind::Inflection => "inflection",
            FeatureKind::ZeroCrossing => "zero-crossing",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remarkable day of the series, with its value and calendar date.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeaturePoint {
    pub day: DayIndex,
    pub value: Minutes,
    pub date: CalendarDate,
    pub kind: FeatureKind,
}

impl fmt::Display for FeaturePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {:.2} min",
            self.kind,
            self.date,
            self.day,
            self.value.value()
        )
    }
}

/// Everything [`extract`] finds in one series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    /// `None` only for an empty series.
    pub max: Option<FeaturePoint>,
    /// `None` only for an empty series.
    pub min: Option<FeaturePoint>,
    pub inflections: Vec<FeaturePoint>,
    pub zero_crossings: Vec<FeaturePoint>,
}

impl Features {
    /// All points, extrema first, then inflections and zero-crossings.
    pub fn iter(&self) -> impl Iterator<Item = &FeaturePoint> {
        self.max
            .iter()
            .chain(self.min.iter())
            .chain(self.inflections.iter())
            .chain(self.zero_crossings.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Running extremum; strict comparison keeps the first occurrence on ties.
#[derive(Copy, Clone)]
struct Extremum {
    position: usize,
    value: f64,
}

impl Extremum {
    fn offer(slot: &mut Option<Self>, position: usize, value: f64, better: fn(f64, f64) -> bool) {
        match slot {
            Some(current) if !better(value, current.value) => {}
            _ => *slot = Some(Self { position, value }),
        }
    }
}

/// Scans `series` once for extrema, inflection points and zero-crossings.
///
/// Never fails on short or flat input: a series of fewer than three days
/// simply has no inflections, a flat one has neither inflections nor
/// crossings.
pub fn extract(series: &EotSeries) -> Features {
    let values = series.values();
    let dates = series.dates();

    let mut max: Option<Extremum> = None;
    let mut min: Option<Extremum> = None;
    let mut inflections = Vec::new();
    let mut zero_crossings = Vec::new();

    for (i, v) in values.iter().map(|v| v.value()).enumerate() {
        Extremum::offer(&mut max, i, v, |new, cur| new > cur);
        Extremum::offer(&mut min, i, v, |new, cur| new < cur);

        if i >= 1 {
            let prev = values[i - 1].value();
            if prev * v < 0.0 {
                zero_crossings.push(i);
            }
        }
        if i >= 2 {
            let (a, b) = (values[i - 2].value(), values[i - 1].value());
            if (a - b) * (b - v) < 0.0 {
                inflections.push(i - 1);
            }
        }
    }

    let point = |position: usize, kind: FeatureKind| FeaturePoint {
        day: DayIndex::from_position(position),
        value: values[position],
        date: dates[position],
        kind,
    };

    Features {
        max: max.map(|m| point(m.position, FeatureKind::Max)),
        min: min.map(|m| point(m.position, FeatureKind::Min)),
        inflections: inflections
            .into_iter()
            .map(|p| point(p, FeatureKind::Inflection))
            .collect(),
        zero_crossings: zero_crossings
            .into_iter()
            .map(|p| point(p, FeatureKind::ZeroCrossing))
            .collect(),
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for FeatureKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl Serialize for FeaturePoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("FeaturePoint", 4)?;
        s.serialize_field("day", &self.day.get())?;
        s.serialize_field("minutes", &self.value.value())?;
        s.serialize_field("date", &self.date)?;
        s.serialize_field("kind", &self.kind)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl Serialize for Features {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Features", 4)?;
        s.serialize_field("max", &self.max)?;
        s.serialize_field("min", &self.min)?;
        s.serialize_field("inflections", &self.inflections)?;
        s.serialize_field("zero_crossings", &self.zero_crossings)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(year: i32, values: &[f64]) -> EotSeries {
        EotSeries::from_values(year, values.iter().copied().map(Minutes::new).collect()).unwrap()
    }

    fn days(points: &[FeaturePoint]) -> Vec<u32> {
        points.iter().map(|p| p.day.get()).collect()
    }

    #[test]
    fn year_2000_has_four_crossings_and_four_turning_points() {
        let features = extract(&EotSeries::for_year(2000).unwrap());

        assert_eq!(days(&features.zero_crossings), vec![106, 165, 245, 360]);
        assert_eq!(days(&features.inflections), vec![43, 134, 207, 307]);

        let max = features.max.unwrap();
        assert_eq!(max.day.get(), 43);
        assert!((max.value.value() - 14.25).abs() < 0.05);
        assert_eq!((max.date.month(), max.date.day()), (2, 12));

        let min = features.min.unwrap();
        assert_eq!(min.day.get(), 307);
        assert!((min.value.value() + 16.42).abs() < 0.05);
        assert_eq!((min.date.month(), min.date.day()), (11, 2));
    }

    #[test]
    fn crossing_dates_fall_in_expected_months() {
        let features = extract(&EotSeries::for_year(2000).unwrap());
        let dates: Vec<(u32, u32)> = features
            .zero_crossings
            .iter()
            .map(|p| (p.date.month(), p.date.day()))
            .collect();
        assert_eq!(dates, vec![(4, 15), (6, 13), (9, 1), (12, 25)]);
    }

    #[test]
    fn ties_pick_first_occurrence() {
        let features = extract(&series(2023, &[1.0, 3.0, 0.5, 3.0, -2.0, -2.0]));
        assert_eq!(features.max.unwrap().day.get(), 2);
        assert_eq!(features.min.unwrap().day.get(), 5);
    }

    #[test]
    fn exact_zero_is_not_a_crossing() {
        let features = extract(&series(2023, &[1.0, 0.0, -1.0, -2.0, 2.0]));
        assert_eq!(days(&features.zero_crossings), vec![5]);
        assert_eq!(features.zero_crossings[0].value, Minutes::new(2.0));
    }

    #[test]
    fn inflection_marks_local_extrema_of_the_samples() {
        let features = extract(&series(2023, &[0.0, 2.0, 1.0, 3.0, 4.0]));
        assert_eq!(days(&features.inflections), vec![2, 3]);
        assert!(features
            .inflections
            .iter()
            .all(|p| p.kind == FeatureKind::Inflection));
    }

    #[test]
    fn plateau_is_not_an_inflection() {
        let features = extract(&series(2023, &[0.0, 1.0, 1.0, 0.0]));
        assert!(features.inflections.is_empty());
    }

    #[test]
    fn flat_series_has_no_crossings_or_inflections() {
        let features = extract(&series(2023, &[2.0; 10]));
        assert!(features.inflections.is_empty());
        assert!(features.zero_crossings.is_empty());
        assert_eq!(features.max.unwrap().day.get(), 1);
        assert_eq!(features.min.unwrap().day.get(), 1);
    }

    #[test]
    fn empty_series_yields_empty_features() {
        let features = extract(&series(2023, &[]));
        assert!(features.is_empty());
        assert_eq!(features, Features::default());
    }

    #[test]
    fn short_series_has_no_inflections() {
        let features = extract(&series(2023, &[1.0, -1.0]));
        assert!(features.inflections.is_empty());
        assert_eq!(days(&features.zero_crossings), vec![2]);
    }

    #[test]
    fn leap_day_dates_are_labelled_correctly() {
        let mut values = vec![1.0; 60];
        values[58] = 5.0;
        values[59] = -1.0;
        let features = extract(&series(2024, &values));
        let cross = features.zero_crossings[0];
        assert_eq!(cross.day.get(), 60);
        assert_eq!((cross.date.month(), cross.date.day()), (2, 29));
    }

    #[test]
    fn iter_lists_every_point_once() {
        let features = extract(&EotSeries::for_year(2023).unwrap());
        assert_eq!(features.iter().count(), 2 + 4 + 4);
        assert_eq!(features.iter().next().map(|p| p.kind), Some(FeatureKind::Max));
    }

    #[test]
    fn display_is_human_readable() {
        let features = extract(&EotSeries::for_year(2000).unwrap());
        let text = features.min.unwrap().to_string();
        assert!(text.starts_with("min 2000-11-02 (day 307)"), "{text}");
    }
}
