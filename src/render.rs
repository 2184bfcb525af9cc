// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Annotated equation-of-time chart, rendered to PNG in memory.
//!
//! The curve is drawn over day-of-year with month names at mid-month ticks,
//! a dashed zero line, and coloured markers:
//!
//! | Colour | Points |
//! |--------|--------|
//! | blue | maximum and minimum |
//! | green | inflection points (local extrema of the samples) |
//! | red | zero-crossings |
//!
//! Pixels are drawn by `plotters` into an RGB buffer which is then encoded
//! with the `image` PNG encoder. Nothing touches the filesystem unless
//! [`Chart::save_in`] is called.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::calendar::Locale;
use crate::error::{EotError, Result};
use crate::features::{FeatureKind, FeaturePoint, Features};
use crate::series::EotSeries;

const CURVE: RGBColor = RGBColor(220, 30, 30);
const EXTREMUM: RGBColor = RGBColor(0, 0, 255);
const INFLECTION: RGBColor = RGBColor(0, 128, 0);
const CROSSING: RGBColor = RGBColor(255, 0, 0);
const GRID: RGBColor = RGBColor(225, 225, 225);

/// Smallest canvas that still leaves room for labels and plot area.
const MIN_SIZE: (u32, u32) = (320, 200);

/// Download name of the chart for `year`.
pub fn file_name_for(year: i32) -> String {
    format!("equation_temps_{year}.png")
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Language of month names and captions.
    pub locale: Locale,
    /// Draw text labels next to markers.
    pub annotate: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            locale: Locale::default(),
            annotate: true,
        }
    }
}

/// A rendered chart: PNG bytes plus what they depict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    year: i32,
    size: (u32, u32),
    png: Vec<u8>,
}

impl Chart {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Encoded PNG bytes, ready for inline display or download.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// `equation_temps_<year>.png`
    pub fn file_name(&self) -> String {
        file_name_for(self.year)
    }

    /// Writes the PNG as [`Chart::file_name`] inside `dir`.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.png)?;
        debug!(path = %path.display(), bytes = self.png.len(), "chart written");
        Ok(path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Captions
// ═══════════════════════════════════════════════════════════════════════════

struct Captions {
    title: String,
    x_desc: &'static str,
    y_desc: &'static str,
    legend: &'static str,
}

impl Captions {
    fn new(locale: Locale, year: i32) -> Self {
        match locale {
            Locale::French => Self {
                title: format!("Équation du Temps - Année {year}"),
                x_desc: "Mois de l'année",
                y_desc: "Équation du temps (minutes)",
                legend: "Équation du temps",
            },
            Locale::English => Self {
                title: format!("Equation of Time - {year}"),
                x_desc: "Month of the year",
                y_desc: "Equation of time (minutes)",
                legend: "Equation of time",
            },
        }
    }
}

/// Text drawn next to a marker.
///
/// Extrema read `Max: 14.2 min`, inflections `12 Fév (14.2 min)`, and
/// zero-crossings carry only their date.
pub fn marker_label(point: &FeaturePoint, locale: Locale) -> String {
    let minutes = point.value.value();
    match point.kind {
        FeatureKind::Max => format!("Max: {minutes:.1} min"),
        FeatureKind::Min => format!("Min: {minutes:.1} min"),
        FeatureKind::Inflection => format!("{} ({minutes:.1} min)", point.date.label(locale)),
        FeatureKind::ZeroCrossing => point.date.label(locale),
    }
}

/// Vertical range covering the curve and the zero line with some headroom.
fn y_bounds(series: &EotSeries) -> (f64, f64) {
    let (lo, hi) = series
        .values()
        .iter()
        .map(|v| v.value())
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi {
        return (-20.0, 20.0);
    }
    (lo.floor() - 2.0, hi.ceil() + 2.0)
}

fn render_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> EotError {
    EotError::Render(err.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════════

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &EotSeries,
    features: &Features,
    style: &ChartStyle,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let captions = Captions::new(style.locale, series.year());
    let locale = style.locale;
    let x_max = (series.len() as f64).max(2.0);
    let (y_lo, y_hi) = y_bounds(series);
    let label_offset = (y_hi - y_lo) * 0.015;

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&captions.title, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(1.0..x_max, y_lo..y_hi)?;

    // The x axis carries month names at mid-month ticks instead of numbers.
    chart
        .configure_mesh()
        .x_labels(0)
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(captions.x_desc)
        .y_desc(captions.y_desc)
        .draw()?;

    for (tick, name) in locale.month_ticks() {
        let x = f64::from(tick);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, y_lo), (x, y_hi)],
            GRID.stroke_width(1),
        )))?;
        let (px, py) = chart.backend_coord(&(x, y_lo));
        root.draw(&Text::new(
            name,
            (px, py + 8),
            ("sans-serif", 15)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }

    chart.draw_series(DashedLineSeries::new(
        vec![(1.0, 0.0), (x_max, 0.0)],
        6,
        4,
        BLACK.stroke_width(1),
    ))?;

    chart
        .draw_series(LineSeries::new(
            series.iter().map(|(d, v)| (f64::from(d.get()), v.value())),
            CURVE.stroke_width(2),
        ))?
        .label(captions.legend)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CURVE.stroke_width(2)));

    let bold = |size: f64, color: &'static RGBColor, pos: Pos| {
        FontDesc::new(FontFamily::SansSerif, size, FontStyle::Bold)
            .color(color)
            .pos(pos)
    };

    // Extrema
    for (point, vpos) in features
        .max
        .iter()
        .map(|p| (p, VPos::Bottom))
        .chain(features.min.iter().map(|p| (p, VPos::Top)))
    {
        let at = (f64::from(point.day.get()), point.value.value());
        chart.draw_series(std::iter::once(Circle::new(at, 5, EXTREMUM.filled())))?;
        if style.annotate {
            chart.draw_series(std::iter::once(Text::new(
                marker_label(point, locale),
                at,
                bold(16.0, &EXTREMUM, Pos::new(HPos::Right, vpos)),
            )))?;
        }
    }

    // Inflection points
    chart.draw_series(features.inflections.iter().map(|p| {
        Circle::new(
            (f64::from(p.day.get()), p.value.value()),
            4,
            INFLECTION.filled(),
        )
    }))?;
    if style.annotate {
        chart.draw_series(features.inflections.iter().map(|p| {
            Text::new(
                marker_label(p, locale),
                (f64::from(p.day.get()), p.value.value() + label_offset * 2.0),
                bold(14.0, &INFLECTION, Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))?;
    }

    // Zero-crossings
    chart.draw_series(features.zero_crossings.iter().map(|p| {
        Circle::new(
            (f64::from(p.day.get()), p.value.value()),
            4,
            CROSSING.filled(),
        )
    }))?;
    if style.annotate {
        chart.draw_series(features.zero_crossings.iter().map(|p| {
            Text::new(
                marker_label(p, locale),
                (f64::from(p.day.get()), label_offset * 2.0),
                bold(15.0, &CROSSING, Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Draws `series` with its `features` and encodes the result as PNG.
///
/// A backend failure (typically no usable system font) is reported as
/// [`EotError::Render`], including when the backend panics.
pub fn render(series: &EotSeries, features: &Features, style: &ChartStyle) -> Result<Chart> {
    let (w, h) = (style.width, style.height);
    if w < MIN_SIZE.0 || h < MIN_SIZE.1 {
        return Err(EotError::Render(format!(
            "canvas {w}x{h} is smaller than {}x{}",
            MIN_SIZE.0, MIN_SIZE.1
        )));
    }

    let mut pixels = vec![0u8; w as usize * h as usize * 3];
    let drawn = panic::catch_unwind(AssertUnwindSafe(|| -> Result<()> {
        let root = BitMapBackend::with_buffer(&mut pixels, (w, h)).into_drawing_area();
        draw(&root, series, features, style).map_err(render_error)?;
        root.present().map_err(render_error)
    }));
    match drawn {
        Ok(result) => result?,
        Err(_) => {
            warn!(year = series.year(), "drawing backend panicked");
            return Err(EotError::Render("drawing backend panicked".to_string()));
        }
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(&pixels, w, h, ColorType::Rgb8)?;
    debug!(year = series.year(), width = w, height = h, bytes = png.len(), "chart encoded");

    Ok(Chart {
        year: series.year(),
        size: (w, h),
        png,
    })
}

/// `true` when plotters can measure text with a system sans-serif font.
#[cfg(test)]
pub(crate) fn fonts_available() -> bool {
    panic::catch_unwind(|| {
        FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Normal)
            .box_size("Jan")
            .is_ok()
    })
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract;
    use image::ImageFormat;
    use plotters_backend::{
        BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingErrorKind,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Text and filled circles issued by [`draw`].
    #[derive(Default)]
    struct Recorded {
        texts: Vec<(String, BackendCoord)>,
        circles: Vec<(BackendCoord, (u8, u8, u8))>,
    }

    impl Recorded {
        fn circles_of(&self, color: RGBColor) -> Vec<BackendCoord> {
            self.circles
                .iter()
                .filter(|(_, rgb)| *rgb == (color.0, color.1, color.2))
                .map(|(at, _)| *at)
                .collect()
        }

        fn text_at(&self, text: &str) -> Vec<BackendCoord> {
            self.texts
                .iter()
                .filter(|(t, _)| t == text)
                .map(|(_, at)| *at)
                .collect()
        }
    }

    struct RecordingBackend {
        size: (u32, u32),
        log: Rc<RefCell<Recorded>>,
    }

    impl DrawingBackend for RecordingBackend {
        type ErrorType = std::io::Error;

        fn get_size(&self) -> (u32, u32) {
            self.size
        }

        fn ensure_prepared(
            &mut self,
        ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn present(&mut self) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn draw_pixel(
            &mut self,
            _point: BackendCoord,
            _color: BackendColor,
        ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn draw_circle<S: BackendStyle>(
            &mut self,
            center: BackendCoord,
            _radius: u32,
            style: &S,
            fill: bool,
        ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
            if fill {
                self.log
                    .borrow_mut()
                    .circles
                    .push((center, style.color().rgb));
            }
            Ok(())
        }

        fn draw_text<TStyle: BackendTextStyle>(
            &mut self,
            text: &str,
            _style: &TStyle,
            pos: BackendCoord,
        ) -> std::result::Result<(), DrawingErrorKind<Self::ErrorType>> {
            self.log.borrow_mut().texts.push((text.to_string(), pos));
            Ok(())
        }
    }

    fn record(year: i32, style: &ChartStyle) -> Recorded {
        let series = EotSeries::for_year(year).unwrap();
        let features = extract(&series);
        let log = Rc::new(RefCell::new(Recorded::default()));
        let root = RecordingBackend {
            size: (style.width, style.height),
            log: Rc::clone(&log),
        }
        .into_drawing_area();
        draw(&root, &series, &features, style).unwrap();
        drop(root);
        log.take()
    }

    #[test]
    fn file_name_follows_download_pattern() {
        assert_eq!(file_name_for(2024), "equation_temps_2024.png");
    }

    #[test]
    fn default_style_is_twelve_by_six() {
        let style = ChartStyle::default();
        assert_eq!((style.width, style.height), (1200, 600));
        assert_eq!(style.locale, Locale::French);
        assert!(style.annotate);
    }

    #[test]
    fn marker_labels_per_kind() {
        let series = EotSeries::for_year(2000).unwrap();
        let features = extract(&series);

        let max = features.max.unwrap();
        assert_eq!(marker_label(&max, Locale::French), "Max: 14.2 min");
        let min = features.min.unwrap();
        assert_eq!(marker_label(&min, Locale::English), "Min: -16.4 min");

        let first_crossing = &features.zero_crossings[0];
        assert_eq!(marker_label(first_crossing, Locale::French), "15 Avr");
        assert_eq!(marker_label(first_crossing, Locale::English), "15 Apr");

        let first_inflection = &features.inflections[0];
        assert_eq!(
            marker_label(first_inflection, Locale::French),
            "12 Fév (14.2 min)"
        );
    }

    #[test]
    fn y_bounds_include_zero_and_headroom() {
        let series = EotSeries::for_year(2000).unwrap();
        let (lo, hi) = y_bounds(&series);
        assert!(lo <= -18.0 && hi >= 16.0);

        let flat = EotSeries::from_values(2000, vec![qtty::Minutes::new(0.0); 5]).unwrap();
        assert_eq!(y_bounds(&flat), (-20.0, 20.0));
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let series = EotSeries::for_year(2000).unwrap();
        let features = extract(&series);
        let style = ChartStyle {
            width: 10,
            height: 10,
            ..ChartStyle::default()
        };
        assert!(matches!(
            render(&series, &features, &style),
            Err(EotError::Render(_))
        ));
    }

    #[test]
    fn month_names_sit_under_the_x_axis_in_order() {
        if !fonts_available() {
            eprintln!("no system font, skipping");
            return;
        }
        let recorded = record(2000, &ChartStyle::default());
        let markers = recorded.circles.iter().map(|((_, y), _)| *y);
        let lowest_marker = markers.max().unwrap();

        let mut previous_x = i32::MIN;
        let mut row = None;
        for name in Locale::French.month_names() {
            let at = recorded.text_at(name);
            assert_eq!(at.len(), 1, "{name}: {at:?}");
            let (x, y) = at[0];
            assert!(x > previous_x, "{name} out of order");
            assert!(y > lowest_marker && y < 600, "{name} at y = {y}");
            assert_eq!(*row.get_or_insert(y), y, "{name} off the label row");
            previous_x = x;
        }
    }

    #[test]
    fn x_axis_has_no_numeric_day_labels() {
        if !fonts_available() {
            eprintln!("no system font, skipping");
            return;
        }
        let style = ChartStyle {
            annotate: false,
            ..ChartStyle::default()
        };
        let recorded = record(2000, &style);
        let (_, month_row) = recorded.text_at("Jan")[0];
        assert!(recorded
            .texts
            .iter()
            .filter(|(_, (_, y))| *y == month_row)
            .all(|(t, _)| Locale::French.month_names().contains(&t.as_str())));
    }

    #[test]
    fn marker_counts_and_colours() {
        if !fonts_available() {
            eprintln!("no system font, skipping");
            return;
        }
        let recorded = record(2000, &ChartStyle::default());
        assert_eq!(recorded.circles_of(EXTREMUM).len(), 2);
        assert_eq!(recorded.circles_of(INFLECTION).len(), 4);
        assert_eq!(recorded.circles_of(CROSSING).len(), 4);
        assert_eq!(recorded.text_at("Max: 14.2 min").len(), 1);
        assert_eq!(recorded.text_at("Min: -16.4 min").len(), 1);

        let bare = record(
            2000,
            &ChartStyle {
                annotate: false,
                ..ChartStyle::default()
            },
        );
        assert_eq!(bare.circles.len(), recorded.circles.len());
        assert!(bare.text_at("Max: 14.2 min").is_empty());
        assert!(bare.text_at("15 Avr").is_empty());
    }

    #[test]
    fn rendered_png_matches_drawn_layout() {
        let series = EotSeries::for_year(2000).unwrap();
        let features = extract(&series);
        let style = ChartStyle::default();
        let result = render(&series, &features, &style);
        if !fonts_available() {
            assert!(matches!(result, Ok(_) | Err(EotError::Render(_))));
            return;
        }

        let chart = result.unwrap();
        assert_eq!(chart.year(), 2000);
        assert_eq!(chart.size(), (1200, 600));
        assert_eq!(&chart.png()[..8], &PNG_MAGIC);
        assert_eq!(chart.file_name(), "equation_temps_2000.png");

        let image = image::load_from_memory_with_format(chart.png(), ImageFormat::Png)
            .unwrap()
            .to_rgb8();
        assert_eq!(image.dimensions(), (1200, 600));

        let recorded = record(2000, &style);
        for (color, expected) in [(CROSSING, 4), (INFLECTION, 4)] {
            let centres = recorded.circles_of(color);
            assert_eq!(centres.len(), expected);
            for (x, y) in centres {
                let pixel = image.get_pixel(x as u32, y as u32).0;
                assert_eq!(pixel, [color.0, color.1, color.2], "marker at ({x}, {y})");
            }
        }
        let curve_pixels = image
            .pixels()
            .filter(|p| p.0 == [CURVE.0, CURVE.1, CURVE.2])
            .count();
        assert!(curve_pixels > 500, "{curve_pixels} curve pixels");
    }
}
