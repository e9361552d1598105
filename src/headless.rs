use crate::config::DemoConfig;
use crate::demo::{PickOutcome, PickingDemo};
use crate::input::FrameInput;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use cubepick_testkit::{
    EventRecord, JsonlSink, MetricsReportBuilder, MetricsSink, PickingMetrics,
    TestExecutionMetrics, TestResult,
};
use glam::Vec2;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Frames simulated when neither a script nor a frame count is given.
const DEFAULT_FRAMES: u64 = 120;

pub struct HeadlessConfig {
    pub config: DemoConfig,
    pub script: Option<PathBuf>,
    pub frames: Option<u64>,
    /// Left clicks, one per frame, replayed before idling.
    pub clicks: Vec<Vec2>,
    pub event_log: Option<PathBuf>,
    pub metrics: Option<PathBuf>,
}

/// What a headless run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub metrics: PickingMetrics,
    /// Label of the object selected when the run ended.
    pub selected: Option<String>,
}

enum InputSource {
    Script(ScriptedInputPlayer),
    /// Pending clicks; the cursor rests on the last one afterwards.
    Clicks { pending: VecDeque<Vec2>, last: Vec2 },
}

impl InputSource {
    fn next_frame(&mut self) -> FrameInput {
        match self {
            InputSource::Script(player) => player.next_frame().unwrap_or_default(),
            InputSource::Clicks { pending, last } => match pending.pop_front() {
                Some(pos) => {
                    *last = pos;
                    FrameInput::left_click(pos)
                }
                None => FrameInput::hover(*last),
            },
        }
    }
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let started = Instant::now();

    let mut source = match &cfg.script {
        Some(path) => {
            let player = ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load mouse script {}", path.display()))?;
            InputSource::Script(player)
        }
        None => InputSource::Clicks {
            pending: cfg.clicks.iter().copied().collect(),
            last: Vec2::ZERO,
        },
    };

    let frames = match (&source, cfg.frames) {
        (_, Some(frames)) => frames,
        (InputSource::Script(player), None) => player.total_frames(),
        (InputSource::Clicks { pending, .. }, None) => (pending.len() as u64).max(DEFAULT_FRAMES),
    };

    let mut events = cfg.event_log.as_ref().map(JsonlSink::create).transpose()?;
    let mut demo = PickingDemo::new(cfg.config);
    let mut metrics = PickingMetrics::default();

    info!(frames, "headless run starting");
    for _ in 0..frames {
        let input = source.next_frame();
        step(&mut demo, &input, &mut metrics, events.as_mut())?;
    }

    metrics.frames = demo.frame_count();
    metrics.obb_count = demo.world().len();
    let selected = demo.selected().map(|id| demo.label(id).to_string());

    if let Some(sink) = events.as_mut() {
        sink.flush()?;
    }

    if let Some(path) = &cfg.metrics {
        let report = MetricsReportBuilder::new("cubepick_headless")
            .result(TestResult::Pass)
            .picking(metrics.clone())
            .execution(TestExecutionMetrics {
                duration_seconds: started.elapsed().as_secs_f64(),
            })
            .build();
        MetricsSink::create(path)?.write(&report)?;
        info!(path = %path.display(), "metrics written");
    }

    info!(
        frames = metrics.frames,
        hits = metrics.hits,
        misses = metrics.misses,
        "headless run finished"
    );
    Ok(RunSummary { metrics, selected })
}

fn step(
    demo: &mut PickingDemo,
    input: &FrameInput,
    metrics: &mut PickingMetrics,
    events: Option<&mut JsonlSink>,
) -> Result<()> {
    if let Some((width, height)) = input.resized {
        demo.resize(width, height);
    }

    let frame = demo.frame_count();
    let before = demo.selected();
    let started = Instant::now();
    let outcome = demo.process_input(input);
    let elapsed_us = started.elapsed().as_secs_f64() * 1_000_000.0;

    let (kind, payload) = match outcome {
        PickOutcome::Idle => (None, String::new()),
        PickOutcome::Picked(pick) => {
            metrics.record_ray_test(elapsed_us);
            metrics.hits += 1;
            if before != Some(pick.object) {
                metrics.selection_changes += 1;
                info!(frame, object = demo.label(pick.object), "selected");
            }
            let payload = format!("{} at {:.3}", demo.label(pick.object), pick.distance);
            (Some("pick"), payload)
        }
        PickOutcome::Missed => {
            metrics.record_ray_test(elapsed_us);
            metrics.misses += 1;
            (Some("miss"), format!("{},{}", input.mouse_pos.x, input.mouse_pos.y))
        }
        PickOutcome::Skipped(err) => {
            metrics.skipped += 1;
            (Some("skipped"), err.to_string())
        }
    };

    if let (Some(kind), Some(sink)) = (kind, events) {
        debug!(frame, kind, "event");
        sink.write(&EventRecord {
            frame,
            kind,
            payload: &payload,
        })?;
    }

    demo.update();
    Ok(())
}
