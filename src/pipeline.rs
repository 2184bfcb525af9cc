// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! One year, end to end: compute → extract → render.
//!
//! Every call builds its own series, features and chart; nothing is cached
//! or shared between calls.

use tracing::{info, info_span};

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::error::Result;
use crate::features::{extract, Features};
use crate::render::{render, Chart, ChartStyle};
use crate::series::EotSeries;

/// Everything produced for one requested year.
#[derive(Debug, Clone)]
pub struct YearReport {
    pub series: EotSeries,
    pub features: Features,
    pub chart: Chart,
}

impl YearReport {
    pub fn year(&self) -> i32 {
        self.series.year()
    }
}

/// Series and features without drawing anything.
pub fn analyze_year(year: i32) -> Result<(EotSeries, Features)> {
    let series = EotSeries::for_year(year)?;
    let features = extract(&series);
    Ok((series, features))
}

/// Runs the full pipeline for `year`.
pub fn plot_year(year: i32, style: &ChartStyle) -> Result<YearReport> {
    let _span = info_span!("plot_year", year).entered();

    let (series, features) = analyze_year(year)?;
    info!(
        days = series.len(),
        inflections = features.inflections.len(),
        zero_crossings = features.zero_crossings.len(),
        "equation of time analysed"
    );

    let chart = render(&series, &features, style)?;
    info!(bytes = chart.png().len(), "chart rendered");

    Ok(YearReport {
        series,
        features,
        chart,
    })
}

/// JSON-friendly view: the year and its remarkable points.
#[cfg(feature = "serde")]
impl Serialize for YearReport {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("YearReport", 4)?;
        s.serialize_field("year", &self.year())?;
        s.serialize_field("days", &self.series.len())?;
        s.serialize_field("features", &self.features)?;
        s.serialize_field("file_name", &self.chart.file_name())?;
        s.end()
    }
}
