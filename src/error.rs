// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for eotime.

use thiserror::Error;

/// Result type for eotime operations.
pub type Result<T> = std::result::Result<T, EotError>;

/// Errors raised while computing or rendering an equation-of-time curve.
#[derive(Error, Debug)]
pub enum EotError {
    /// The day-of-year does not exist in the requested year.
    #[error("invalid date: day {day} does not exist in year {year}")]
    InvalidDate { day: u32, year: i32 },

    /// The drawing backend failed (missing fonts, undersized buffer, ...).
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// The rendered pixels could not be encoded as PNG.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// I/O error while writing a chart to disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_date_message_names_day_and_year() {
        let err = EotError::InvalidDate {
            day: 366,
            year: 2023,
        };
        assert_eq!(
            err.to_string(),
            "invalid date: day 366 does not exist in year 2023"
        );
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(EotError::Io(_))));
    }
}
