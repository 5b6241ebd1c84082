mod script;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use glam::Vec3;

use cavern_engine::capture::{CaptureContext, CaptureScheduler, PassReport};
use cavern_engine::config::RigConfig;
use cavern_engine::debug::{frustum_segments, DebugOverlay, LineSegment};
use cavern_engine::device::{GpuInit, HeadlessGpu};
use cavern_engine::input::{InputFrame, InputState, Pose, PoseStream};
use cavern_engine::logging::{init_logging, LoggingConfig};
use cavern_engine::projection::OffAxisSolver;
use cavern_engine::render::OffscreenRenderer;
use cavern_engine::time::FrameClock;
use cavern_engine::viewpoint::{AnchorRelay, EyePair, ViewpointSelector};

use script::{DemoScript, HostCommand};

/// Simulated display refresh rate.
const DISPLAY_HZ: f32 = 90.0;

const USAGE: &str = "usage: cavern-studio [RIG.toml] [--frames N] [--fallback-adapter]";

#[derive(Debug)]
struct Args {
    rig: Option<PathBuf>,
    frames: u64,
    fallback_adapter: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        rig: None,
        frames: 540,
        fallback_adapter: false,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--frames" => {
                let value = it.next().context(USAGE)?;
                args.frames = value
                    .parse()
                    .with_context(|| format!("invalid frame count {value:?}"))?;
            }
            "--fallback-adapter" => args.fallback_adapter = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown flag {other}\n{USAGE}"),
            path => args.rig = Some(PathBuf::from(path)),
        }
    }

    Ok(args)
}

#[derive(Debug, Default)]
struct Totals {
    passes: u64,
    frames: usize,
    bytes: usize,
    skipped: usize,
    failures: usize,
}

impl Totals {
    fn add(&mut self, report: &PassReport) {
        self.passes += 1;
        self.frames += report.frames.len();
        self.bytes += report.frames.iter().map(|f| f.byte_len()).sum::<usize>();
        self.skipped += report.skipped.len();
        self.failures += report.failures.len();
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let args = parse_args()?;

    let rig = match &args.rig {
        Some(path) => RigConfig::load(path)?,
        None => {
            log::info!("no rig file given, using the built-in corner rig");
            RigConfig::default()
        }
    };

    let screens = rig.screens()?;

    let mut solver_config = rig.solver();
    if solver_config.depth_range != OffscreenRenderer::DEPTH_RANGE {
        log::info!(
            "rig depth range {:?} overridden by renderer ({:?})",
            solver_config.depth_range,
            OffscreenRenderer::DEPTH_RANGE
        );
        solver_config.depth_range = OffscreenRenderer::DEPTH_RANGE;
    }
    let solver = OffAxisSolver::new(solver_config);

    let mut scheduler = CaptureScheduler::new(rig.capture()?, rig.bindings(&screens));

    let gpu = HeadlessGpu::new_blocking(GpuInit {
        force_fallback_adapter: args.fallback_adapter,
        power_preference: if args.fallback_adapter {
            wgpu::PowerPreference::LowPower
        } else {
            wgpu::PowerPreference::HighPerformance
        },
        ..Default::default()
    })
    .context("headless GPU bring-up failed")?;
    let mut renderer = OffscreenRenderer::new(&gpu, scheduler.bindings());

    scheduler.start()?;
    let handle = scheduler.handle();

    let stereo = rig.stereo();
    let mut input = InputState::default();
    let mut frame = InputFrame::default();
    let mut selector = ViewpointSelector::new(rig.selector());
    let mut anchors = AnchorRelay::new(rig.anchors.toggle_button);
    let mut overlay: Vec<LineSegment> = Vec::new();
    let mut clock = FrameClock::new();
    let script = DemoScript::new(DISPLAY_HZ);
    let mut totals = Totals::default();

    let frame_dt = Duration::from_secs_f32(1.0 / DISPLAY_HZ);
    let fallback_head = Pose::from_position(Vec3::new(0.0, 1.6, 0.0));

    log::info!(
        "running {} frames at {DISPLAY_HZ} Hz, capturing {} slots at {} passes/s",
        args.frames,
        renderer.slot_count(),
        scheduler.config().rate
    );

    for _ in 0..args.frames {
        let time = clock.advance(frame_dt);

        frame.clear();
        for ev in script.events(time.frame_index) {
            input.apply_event(&mut frame, ev);
        }

        match script.command(time.frame_index) {
            Some(HostCommand::StopCapture) => handle.request_stop(),
            Some(HostCommand::StartCapture) => handle.request_start(),
            None => {}
        }

        let head = input.pose(PoseStream::Head).unwrap_or(fallback_head);
        let hand = input.pose(PoseStream::Hand).unwrap_or(head);
        let head_eyes = EyePair::from_pose(&head, &stereo);
        let hand_eyes = anchors.update(&frame, EyePair::from_pose(&hand, &stereo));

        let active = selector.update(&input, head_eyes, hand_eyes);
        overlay.draw_segments(&frustum_segments(&screens, &active, rig.debug_origin));

        let ctx = CaptureContext {
            screens: &screens,
            solver: &solver,
            source: active.selection.source,
            eyes: &active,
        };

        if let Some(report) = scheduler.tick(&time, &ctx, &mut renderer) {
            log::info!(
                "pass {:>3} [{}] frame {:>4}: {} captured, {} skipped, {} failed, {} clamped, overlay {}",
                report.index,
                report.source,
                time.frame_index,
                report.frames.len(),
                report.skipped.len(),
                report.failures.len(),
                report.clamped,
                overlay.len()
            );
            totals.add(&report);
        }
    }

    scheduler.stop();
    log::info!(
        "done: {} passes, {} images ({} KiB), {} skipped, {} failed",
        totals.passes,
        totals.frames,
        totals.bytes / 1024,
        totals.skipped,
        totals.failures
    );

    Ok(())
}
