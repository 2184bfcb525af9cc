// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Day numbers on the Universal Time axis.
//!
//! The equation-of-time model is referenced to UT and to the J2000.0
//! instant (2000-01-01T12:00:00 UT, JD 2 451 545.0). [`JulianDay`] stores a
//! single [`Days`] quantity, so it is layout-identical to an `f64`.
//!
//! No ΔT correction is applied anywhere: civil timestamps are read as UT and
//! the elapsed-day count `T` is the plain difference of two UT Julian days.

use chrono::{DateTime, NaiveTime, Utc};
use qtty::*;
use std::ops::{Add, Sub};

use crate::calendar::CalendarDate;

/// Julian Day of the Unix epoch (1970-01-01T00:00:00 UT).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// An absolute Julian Day on the UT axis.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay {
    quantity: Days,
}

impl JulianDay {
    /// J2000.0 epoch: 2000-01-01T12:00:00 UT (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    // ── constructors ──────────────────────────────────────────────────

    /// Create from a raw Julian Day number.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    #[inline]
    const fn from_days(days: Days) -> Self {
        Self { quantity: days }
    }

    /// Build an instant from a `chrono::DateTime<Utc>`, read as UT.
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        let seconds_since_epoch = Seconds::new(datetime.timestamp() as f64);
        let nanos = Seconds::new(datetime.timestamp_subsec_nanos() as f64 / 1e9);
        Self::from_days(Days::new(UNIX_EPOCH_JD) + (seconds_since_epoch + nanos).to::<Day>())
    }

    /// Noon UT of a calendar date.
    pub fn at_noon(date: CalendarDate) -> Self {
        let midnight = date.naive().and_time(NaiveTime::MIN).and_utc();
        Self::from_utc(midnight) + Days::new(0.5)
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// The underlying scalar value in days.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Elapsed days `T` since J2000.0 (negative before 2000-01-01T12:00 UT).
    #[inline]
    pub fn days_since_j2000(&self) -> Days {
        *self - Self::J2000
    }
}

impl std::fmt::Display for JulianDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JD(UT) {}", self.quantity)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Days> for JulianDay {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl Sub for JulianDay {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}
