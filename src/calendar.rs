// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Day-of-year indices and Gregorian calendar dates.
//!
//! A [`DayIndex`] is only ever built against a year, so holding one means
//! the day exists in that year: `1..=365`, or `1..=366` when the year is a
//! leap year. Conversion to a [`CalendarDate`] goes through `chrono`.
//!
//! Month names and the mid-month tick positions used on chart axes live in
//! the immutable [`Locale`] tables.

use chrono::{Datelike, NaiveDate};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::error::{EotError, Result};

/// `true` for Gregorian leap years.
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year` (365 or 366).
#[inline]
pub const fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DayIndex
// ═══════════════════════════════════════════════════════════════════════════

/// One-based day of the year, validated against a specific year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayIndex(u32);

impl DayIndex {
    /// January 1st.
    pub const FIRST: Self = Self(1);

    /// Validates `day` against the length of `year`.
    pub fn new(day: u32, year: i32) -> Result<Self> {
        if day == 0 || day > days_in_year(year) {
            return Err(EotError::InvalidDate { day, year });
        }
        Ok(Self(day))
    }

    /// Every day of `year`, in order.
    pub fn all_in(year: i32) -> impl Iterator<Item = DayIndex> {
        (1..=days_in_year(year)).map(DayIndex)
    }

    /// Builds an index from a zero-based position in a dense yearly vector.
    #[inline]
    pub(crate) const fn from_position(position: usize) -> Self {
        Self(position as u32 + 1)
    }

    /// The raw one-based day number.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position in a dense yearly vector.
    #[inline]
    pub const fn position(self) -> usize {
        self.0 as usize - 1
    }

    /// Calendar date of this day in `year`.
    pub fn to_date(self, year: i32) -> Result<CalendarDate> {
        NaiveDate::from_yo_opt(year, self.0)
            .map(CalendarDate::from)
            .ok_or(EotError::InvalidDate { day: self.0, year })
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CalendarDate
// ═══════════════════════════════════════════════════════════════════════════

/// A valid Gregorian date.
///
/// Only built through [`CalendarDate::new`], [`DayIndex::to_date`] or from a
/// `chrono::NaiveDate`, so February 30 and friends cannot be represented.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date, rejecting combinations such as February 30.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(EotError::InvalidDate { day, year })
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month, `1..=12`.
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, `1..=31`.
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Day-of-year index of this date.
    pub fn day_index(&self) -> DayIndex {
        DayIndex(self.0.ordinal())
    }

    /// Short label such as `15 Avr` or `15 Apr`, as drawn next to markers.
    pub fn label(&self, locale: Locale) -> String {
        format!("{} {}", self.day(), locale.month_name(self.month()))
    }

    #[inline]
    pub(crate) fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

#[cfg(feature = "serde")]
impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("CalendarDate", 3)?;
        s.serialize_field("year", &self.year())?;
        s.serialize_field("month", &self.month())?;
        s.serialize_field("day", &self.day())?;
        s.end()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Month tables
// ═══════════════════════════════════════════════════════════════════════════

/// Mid-month day-of-year positions used as x-axis ticks (non-leap year).
pub const MONTH_TICKS: [u32; 12] = [15, 46, 74, 105, 135, 166, 196, 227, 258, 288, 319, 349];

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sept", "Oct", "Nov", "Déc",
];

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Language of month names and chart captions.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    French,
    English,
}

impl Locale {
    /// Abbreviated month names, January first.
    pub const fn month_names(self) -> &'static [&'static str; 12] {
        match self {
            Locale::French => &MONTHS_FR,
            Locale::English => &MONTHS_EN,
        }
    }

    /// Abbreviated name of a 1-based month; out-of-range months clamp.
    pub fn month_name(self, month: u32) -> &'static str {
        let i = (month.clamp(1, 12) - 1) as usize;
        self.month_names()[i]
    }

    /// `(tick position, month name)` pairs for axis labelling.
    pub fn month_ticks(self) -> impl Iterator<Item = (u32, &'static str)> {
        MONTH_TICKS.iter().copied().zip(self.month_names().iter().copied())
    }
}
