// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Equation of Time — low-precision solar model
//!
//! The equation of time is the difference between the Sun's right ascension
//! and its mean longitude, expressed as time: the Earth turns one degree in
//! four minutes.
//!
//! ## Model
//!
//! With `T` the days elapsed since J2000.0 (2000-01-01T12:00 UT):
//!
//! ```text
//! LM = 280.460 + 0.9856474·T                  (mean longitude, mod 360)
//! M  = 357.528 + 0.9856003·T                  (mean anomaly, mod 360)
//! L  = LM + 1.915·sin(M) + 0.020·sin(2M)      (true longitude, mod 360)
//! AD = atan2(cos ε · sin L, cos L)            (right ascension, [0, 360))
//! EoT = 4 · fold(AD − LM)                     (minutes, fold into [-180, 180])
//! ```
//!
//! with ε = 23.439281° the obliquity of the ecliptic.
//!
//! The result is location-independent. Its amplitude stays within about
//! ±17 minutes and the model error grows slowly away from J2000.
//!
//! ## Quick Example
//! ```rust
//! use eotime::compute;
//!
//! let minutes = compute(307, 2024).unwrap();
//! assert!(minutes.value() < -16.0);
//! ```

use qtty::{Degrees, Minutes};

use crate::calendar::DayIndex;
use crate::error::Result;
use crate::julian::JulianDay;

/// Mean longitude of the Sun at J2000.0.
const MEAN_LONGITUDE_J2000: Degrees = Degrees::new(280.460);
/// Daily motion of the mean longitude.
const MEAN_LONGITUDE_RATE: f64 = 0.985_647_4;

/// Mean anomaly of the Sun at J2000.0.
const MEAN_ANOMALY_J2000: Degrees = Degrees::new(357.528);
/// Daily motion of the mean anomaly.
const MEAN_ANOMALY_RATE: f64 = 0.985_600_3;

/// Equation-of-center amplitudes (first and second harmonic).
const CENTER_1: Degrees = Degrees::new(1.915);
const CENTER_2: Degrees = Degrees::new(0.020);

/// Obliquity of the ecliptic.
pub const OBLIQUITY: Degrees = Degrees::new(23.439_281);

/// Minutes of time per degree of Earth rotation.
const MINUTES_PER_DEGREE: f64 = 4.0;

/// Reduce an angle to `[0, 360)`.
#[inline]
fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Solar angles at one instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarPosition {
    /// Mean longitude `LM`, in `[0, 360)`.
    pub mean_longitude: Degrees,
    /// Mean anomaly `M`, in `[0, 360)`.
    pub mean_anomaly: Degrees,
    /// True (ecliptic) longitude `L`, in `[0, 360)`.
    pub true_longitude: Degrees,
    /// Right ascension `AD`, in `[0, 360)`.
    pub right_ascension: Degrees,
}

impl SolarPosition {
    /// Evaluates the solar angles at a UT Julian day.
    pub fn at(jd: JulianDay) -> Self {
        let t = jd.days_since_j2000().value();

        let lm = normalize(MEAN_LONGITUDE_J2000.value() + MEAN_LONGITUDE_RATE * t);
        let m = normalize(MEAN_ANOMALY_J2000.value() + MEAN_ANOMALY_RATE * t);
        let m_rad = m.to_radians();

        let l = normalize(
            lm + CENTER_1.value() * m_rad.sin() + CENTER_2.value() * (2.0 * m_rad).sin(),
        );
        let l_rad = l.to_radians();

        let eps = OBLIQUITY.value().to_radians();
        let ad = normalize((eps.cos() * l_rad.sin()).atan2(l_rad.cos()).to_degrees());

        Self {
            mean_longitude: Degrees::new(lm),
            mean_anomaly: Degrees::new(m),
            true_longitude: Degrees::new(l),
            right_ascension: Degrees::new(ad),
        }
    }

    /// `AD − LM` folded into `[-180, 180]`.
    pub fn hour_angle_offset(&self) -> Degrees {
        let mut diff = normalize(self.right_ascension.value() - self.mean_longitude.value());
        if diff > 180.0 {
            diff -= 360.0;
        }
        Degrees::new(diff)
    }

    /// The offset converted to minutes of time.
    pub fn equation_of_time(&self) -> Minutes {
        Minutes::new(self.hour_angle_offset().value() * MINUTES_PER_DEGREE)
    }
}

/// Equation of time at an arbitrary UT instant.
#[inline]
pub fn equation_of_time(jd: JulianDay) -> Minutes {
    SolarPosition::at(jd).equation_of_time()
}

/// Equation of time at noon UT of day-of-year `day` in `year`.
///
/// Fails with [`EotError::InvalidDate`](crate::EotError::InvalidDate) when
/// `day` is `0` or past the end of the year.
pub fn compute(day: u32, year: i32) -> Result<Minutes> {
    let date = DayIndex::new(day, year)?.to_date(year)?;
    Ok(equation_of_time(JulianDay::at_noon(date)))
}
