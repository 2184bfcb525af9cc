// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Full-year equation-of-time series.

use qtty::Minutes;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::calendar::{days_in_year, CalendarDate, DayIndex};
use crate::equation::equation_of_time;
use crate::error::Result;
use crate::julian::JulianDay;

/// One equation-of-time value per day of a year.
///
/// Values are stored densely: the value for [`DayIndex`] `d` sits at
/// position `d - 1`, so indices are contiguous from 1 by construction. Every
/// stored value has a calendar date, resolved once when the series is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EotSeries {
    year: i32,
    values: Vec<Minutes>,
    dates: Vec<CalendarDate>,
}

impl EotSeries {
    /// Evaluates the equation of time at noon UT of every day of `year`.
    pub fn for_year(year: i32) -> Result<Self> {
        let dates = DayIndex::all_in(year)
            .map(|day| day.to_date(year))
            .collect::<Result<Vec<_>>>()?;
        let values = dates
            .iter()
            .map(|&date| equation_of_time(JulianDay::at_noon(date)))
            .collect::<Vec<_>>();
        debug!(year, days = values.len(), "computed equation-of-time series");
        Ok(Self {
            year,
            values,
            dates,
        })
    }

    /// Wraps precomputed values, day 1 first.
    ///
    /// Shorter-than-a-year series are accepted so that partial or synthetic
    /// data can go through feature extraction; longer ones are rejected
    /// because their trailing days have no calendar date.
    pub fn from_values(year: i32, values: Vec<Minutes>) -> Result<Self> {
        let dates = (0..values.len())
            .map(|i| DayIndex::from_position(i).to_date(year))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            year,
            values,
            dates,
        })
    }

    /// Year the series belongs to.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` when there is exactly one value per day of the year.
    pub fn is_complete(&self) -> bool {
        self.values.len() == days_in_year(self.year) as usize
    }

    /// Value for a given day, if present.
    pub fn get(&self, day: DayIndex) -> Option<Minutes> {
        self.values.get(day.position()).copied()
    }

    /// Raw values, day 1 first.
    #[inline]
    pub fn values(&self) -> &[Minutes] {
        &self.values
    }

    /// `(day, value)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (DayIndex, Minutes)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (DayIndex::from_position(i), *v))
    }

    /// Calendar date of a day in this series' year.
    pub fn date_of(&self, day: DayIndex) -> Result<CalendarDate> {
        day.to_date(self.year)
    }

    /// Dates of the stored values, parallel to [`EotSeries::values`].
    #[inline]
    pub fn dates(&self) -> &[CalendarDate] {
        &self.dates
    }
}

#[cfg(feature = "serde")]
impl Serialize for EotSeries {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let minutes: Vec<f64> = self.values.iter().map(|v| v.value()).collect();
        let mut s = serializer.serialize_struct("EotSeries", 2)?;
        s.serialize_field("year", &self.year)?;
        s.serialize_field("minutes", &minutes)?;
        s.end()
    }
}
