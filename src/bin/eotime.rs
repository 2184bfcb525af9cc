// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Equation-of-time chart generator.
//!
//! Computes the equation of time for one year, marks its remarkable points,
//! and writes the chart as `equation_temps_<year>.png`.
//!
//! # Usage
//!
//! ```bash
//! # Current year, French labels, PNG in the working directory
//! cargo run --bin eotime
//!
//! # A given year, English labels, JSON summary on stdout
//! cargo run --bin eotime -- --year 2024 --locale en --summary
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

use eotime::{plot_year, ChartStyle, Locale};

#[derive(Parser, Debug)]
#[command(author, version, about = "Equation of time chart generator", long_about = None)]
struct Cli {
    /// Year to plot (defaults to the current year)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1900..=2100))]
    year: Option<i32>,

    /// Directory receiving equation_temps_<year>.png
    #[arg(short, long, default_value = ".", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Language of month names and captions
    #[arg(long, value_enum, default_value_t = LocaleOpt::Fr)]
    locale: LocaleOpt,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Draw markers without text labels
    #[arg(long, action = ArgAction::SetTrue)]
    no_labels: bool,

    /// Print the remarkable points as JSON on stdout
    #[arg(long, action = ArgAction::SetTrue)]
    summary: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LocaleOpt {
    Fr,
    En,
}

impl From<LocaleOpt> for Locale {
    fn from(opt: LocaleOpt) -> Self {
        match opt {
            LocaleOpt::Fr => Locale::French,
            LocaleOpt::En => Locale::English,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let year = cli.year.unwrap_or_else(|| Local::now().year());
    let style = ChartStyle {
        width: cli.width,
        height: cli.height,
        locale: cli.locale.into(),
        annotate: !cli.no_labels,
    };

    let report =
        plot_year(year, &style).with_context(|| format!("plotting equation of time for {year}"))?;

    let path = report
        .chart
        .save_in(&cli.out_dir)
        .with_context(|| format!("writing chart into {}", cli.out_dir.display()))?;
    info!("Wrote chart: {}", path.display());

    for point in report.features.iter() {
        info!("{point}");
    }

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
