// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Equation of Time
//!
//! This crate computes the equation of time, the gap between sundial time
//! and clock time, over a calendar year, finds its remarkable points, and
//! draws them on an annotated PNG chart.
//!
//! # Core types
//!
//! - [`compute`] — minutes of discrepancy at noon UT of a day of a year.
//! - [`SolarPosition`] — the solar angles behind one evaluation.
//! - [`JulianDay`] — UT Julian day and the J2000.0 reference instant.
//! - [`DayIndex`] / [`CalendarDate`] — day-of-year and Gregorian dates.
//! - [`EotSeries`] — one value per day of a year.
//! - [`Features`] / [`FeaturePoint`] — extrema, inflections, zero-crossings.
//! - [`Chart`] / [`ChartStyle`] — rendered PNG and its options.
//! - [`YearReport`] — series, features and chart for one year.
//!
//! # Pipeline
//!
//! | Step | Function |
//! |------|----------|
//! | compute | [`EotSeries::for_year`] |
//! | extract | [`extract`] |
//! | render | [`render`] |
//! | all three | [`plot_year`] |
//!
//! # Sign convention
//!
//! Values are `4 · (AD − LM)` minutes: positive in February (about +14.2),
//! negative in early November (about −16.4).

mod calendar;
mod equation;
mod error;
mod features;
mod julian;
mod pipeline;
mod render;
mod series;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{days_in_year, is_leap_year, CalendarDate, DayIndex, Locale, MONTH_TICKS};
pub use equation::{compute, equation_of_time, SolarPosition, OBLIQUITY};
pub use error::{EotError, Result};
pub use features::{extract, FeatureKind, FeaturePoint, Features};
pub use julian::JulianDay;
pub use pipeline::{analyze_year, plot_year, YearReport};
pub use render::{file_name_for, marker_label, render, Chart, ChartStyle};
pub use series::EotSeries;
