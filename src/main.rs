//! cubepick - mouse picking over a scene of cubes
//!
//! Headless driver: builds the demo scene, replays mouse input and reports
//! what got selected.

mod config;
mod demo;
mod headless;
mod input;
mod scripted_input;

use anyhow::Result;
use config::DemoConfig;
use glam::Vec2;
use headless::HeadlessConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    let cli = CliOptions::parse(env::args().skip(1));

    // WARN by default, INFO with --verbose; RUST_LOG overrides both.
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting cubepick v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => DemoConfig::load_from_path(path),
        None => DemoConfig::load(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if config.width == 0 || config.height == 0 {
        anyhow::bail!("--width and --height must be non-zero");
    }
    if let Some(path) = &cli.write_config {
        config.save_to_path(path)?;
        info!(path = %path.display(), "effective config written");
    }
    if cli.script.is_some() && !cli.clicks.is_empty() {
        tracing::warn!("--click is ignored when --script is given");
    }

    let summary = headless::run(HeadlessConfig {
        config,
        script: cli.script,
        frames: cli.frames,
        clicks: cli.clicks,
        event_log: cli.event_log,
        metrics: cli.metrics,
    })?;

    let metrics = &summary.metrics;
    println!(
        "frames: {}  rays: {}  hits: {} ({:.0}%)  misses: {}  skipped: {}",
        metrics.frames,
        metrics.rays_cast,
        metrics.hits,
        metrics.hit_rate() * 100.0,
        metrics.misses,
        metrics.skipped
    );
    match &summary.selected {
        Some(label) => println!("selected: {label}"),
        None => println!("selected: nothing"),
    }

    info!("cubepick shutting down");
    Ok(())
}

#[derive(Clone, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    write_config: Option<PathBuf>,
    script: Option<PathBuf>,
    frames: Option<u64>,
    width: Option<u32>,
    height: Option<u32>,
    event_log: Option<PathBuf>,
    metrics: Option<PathBuf>,
    clicks: Vec<Vec2>,
    verbose: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" | "-v" => opts.verbose = true,
                "--config" => opts.config = next_path(&mut args, "--config"),
                "--write-config" => opts.write_config = next_path(&mut args, "--write-config"),
                "--script" => opts.script = next_path(&mut args, "--script"),
                "--event-log" => opts.event_log = next_path(&mut args, "--event-log"),
                "--metrics" => opts.metrics = next_path(&mut args, "--metrics"),
                "--frames" => opts.frames = next_number(&mut args, "--frames"),
                "--width" => opts.width = next_number(&mut args, "--width"),
                "--height" => opts.height = next_number(&mut args, "--height"),
                "--click" => {
                    if let Some(raw) = args.next() {
                        match parse_point(&raw) {
                            Some(point) => opts.clicks.push(point),
                            None => {
                                tracing::error!(value = %raw, "--click expects x,y");
                            }
                        }
                    } else {
                        tracing::error!("--click requires a position like 480,270");
                    }
                }
                other => {
                    tracing::warn!(arg = other, "Ignoring unknown argument");
                }
            }
        }

        opts
    }
}

fn next_path<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<PathBuf> {
    let path = args.next().map(PathBuf::from);
    if path.is_none() {
        tracing::error!("{flag} requires a file path");
    }
    path
}

fn next_number<T, I>(args: &mut I, flag: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    I: Iterator<Item = String>,
{
    let Some(raw) = args.next() else {
        tracing::error!("{flag} requires a number");
        return None;
    };
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(%err, value = %raw, "{flag} must be a number");
            None
        }
    }
}

fn parse_point(raw: &str) -> Option<Vec2> {
    let (x, y) = raw.split_once(',')?;
    Some(Vec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}
