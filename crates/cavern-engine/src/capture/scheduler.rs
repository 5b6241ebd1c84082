use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CaptureError, ConfigError, ProjectionError, RenderError};
use crate::geometry::ScreenSet;
use crate::projection::OffAxisSolver;
use crate::time::FrameTime;
use crate::viewpoint::{EyeSource, ViewpointSource};

use super::{CaptureBindings, CaptureConfig, CapturedFrame, Renderer, TargetId};

const REQUEST_NONE: u8 = 0;
const REQUEST_START: u8 = 1;
const REQUEST_STOP: u8 = 2;

/// Lifecycle of the periodic capture task.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CaptureState {
    Stopped,
    Running,
}

/// Suspension point the running task is parked at.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Phase {
    /// Capture at the next frame end.
    AwaitFrameEnd,
    /// Inter-pass sleep.
    Sleeping { remaining: Duration },
}

/// Thread-safe remote for start/stop.
///
/// Requests are flags consumed at the next tick boundary, never mid-pass.
/// The latest request wins.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    request: Arc<AtomicU8>,
}

impl CaptureHandle {
    pub fn request_start(&self) {
        self.request.store(REQUEST_START, Ordering::Release);
    }

    pub fn request_stop(&self) {
        self.request.store(REQUEST_STOP, Ordering::Release);
    }
}

/// Everything a pass reads, borrowed for one tick.
pub struct CaptureContext<'a> {
    pub screens: &'a ScreenSet,
    pub solver: &'a OffAxisSolver,
    /// Source whose output set is captured.
    pub source: ViewpointSource,
    /// Queried per binding, at the moment it is rendered.
    pub eyes: &'a dyn EyeSource,
}

/// Binding skipped because its projection could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBinding {
    pub target: TargetId,
    pub error: ProjectionError,
}

/// Binding whose render or readback failed.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingFailure {
    pub target: TargetId,
    pub error: RenderError,
}

/// Outcome of one capture pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub index: u64,
    pub source: ViewpointSource,
    pub frames: Vec<CapturedFrame>,
    pub skipped: Vec<SkippedBinding>,
    pub failures: Vec<BindingFailure>,
    /// Bindings whose eye-plane distance was clamped.
    pub clamped: usize,
}

impl PassReport {
    fn new(index: u64, source: ViewpointSource) -> Self {
        Self {
            index,
            source,
            frames: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            clamped: 0,
        }
    }

    /// No skipped or failed binding.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.frames.len() + self.skipped.len() + self.failures.len()
    }
}

/// Restartable periodic capture task, as an explicit state machine.
///
/// The host calls [`tick`](Self::tick) once per completed display frame. While
/// running, a tick either captures every binding of the active output set
/// (one pass) or consumes part of the `1 / rate` sleep that follows a pass.
/// Passes never overlap and bindings render strictly one after another.
#[derive(Debug)]
pub struct CaptureScheduler {
    config: CaptureConfig,
    bindings: CaptureBindings,
    state: CaptureState,
    phase: Phase,
    passes: u64,
    request: Arc<AtomicU8>,
}

impl CaptureScheduler {
    /// Creates a stopped scheduler.
    pub fn new(config: CaptureConfig, bindings: CaptureBindings) -> Self {
        Self {
            config,
            bindings,
            state: CaptureState::Stopped,
            phase: Phase::AwaitFrameEnd,
            passes: 0,
            request: Arc::new(AtomicU8::new(REQUEST_NONE)),
        }
    }

    /// Enters `Running`. A no-op when already running.
    ///
    /// The first pass happens at the next frame end.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.config.validate()?;
        if self.state == CaptureState::Running {
            return Ok(());
        }
        self.state = CaptureState::Running;
        self.phase = Phase::AwaitFrameEnd;
        log::debug!("capture started at {} passes/s", self.config.rate);
        Ok(())
    }

    /// Enters `Stopped`. A no-op when already stopped.
    pub fn stop(&mut self) {
        if self.state == CaptureState::Stopped {
            return;
        }
        self.state = CaptureState::Stopped;
        log::debug!("capture stopped after {} passes", self.passes);
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CaptureState::Running
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            request: Arc::clone(&self.request),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn bindings(&self) -> &CaptureBindings {
        &self.bindings
    }

    /// Replaces the capture rate. Takes effect from the next sleep.
    pub fn set_config(&mut self, config: CaptureConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Sleep left before the next pass, if the task is sleeping.
    pub fn next_sleep(&self) -> Option<Duration> {
        match (self.state, self.phase) {
            (CaptureState::Running, Phase::Sleeping { remaining }) => Some(remaining),
            _ => None,
        }
    }

    /// Advances the task by one display frame.
    ///
    /// Returns the report of the pass run at this frame end, if any.
    pub fn tick<R>(
        &mut self,
        time: &FrameTime,
        ctx: &CaptureContext<'_>,
        renderer: &mut R,
    ) -> Option<PassReport>
    where
        R: Renderer + ?Sized,
    {
        self.apply_requests();

        if self.state == CaptureState::Stopped {
            return None;
        }

        if let Phase::Sleeping { remaining } = self.phase {
            let remaining = remaining.saturating_sub(time.dt);
            if !remaining.is_zero() {
                self.phase = Phase::Sleeping { remaining };
                return None;
            }
            self.phase = Phase::AwaitFrameEnd;
        }

        let report = self.run_pass(ctx, renderer);
        self.phase = Phase::Sleeping {
            remaining: self.config.interval(),
        };
        Some(report)
    }

    fn apply_requests(&mut self) {
        match self.request.swap(REQUEST_NONE, Ordering::AcqRel) {
            REQUEST_START => {
                if let Err(err) = self.start() {
                    log::error!("{err}");
                }
            }
            REQUEST_STOP => self.stop(),
            _ => {}
        }
    }

    fn run_pass<R>(&mut self, ctx: &CaptureContext<'_>, renderer: &mut R) -> PassReport
    where
        R: Renderer + ?Sized,
    {
        let mut report = PassReport::new(self.passes, ctx.source);
        self.passes += 1;

        let Some(set) = self.bindings.set_for(ctx.source) else {
            log::warn!("no output set for source {}", ctx.source);
            return report;
        };

        // Restored on every exit path, unwinding included.
        let saved = renderer.active_destination();
        let mut renderer = scopeguard::guard(renderer, move |r| r.set_active_destination(saved));

        for target in set.targets() {
            let Some(screen) = ctx.screens.get(target.id.screen) else {
                log::warn!("{}: screen not resolved, skipping", target.id);
                continue;
            };

            let eye = ctx.eyes.eye(target.id.eye);
            let projection = match ctx.solver.solve(&eye, screen.corners()) {
                Ok(projection) => projection,
                Err(error) => {
                    log::warn!("{}: {error}, skipping binding", target.id);
                    report.skipped.push(SkippedBinding {
                        target: target.id,
                        error,
                    });
                    continue;
                }
            };
            if projection.clamped {
                report.clamped += 1;
            }

            renderer.set_active_destination(Some(target.id));
            match renderer.render(target, &eye, &projection.matrix()) {
                Ok(frame) => report.frames.push(frame),
                Err(error) => {
                    log::error!("{}: {error}", target.id);
                    report.failures.push(BindingFailure {
                        target: target.id,
                        error,
                    });
                }
            }
        }

        log::debug!(
            "pass {} ({}): {} captured, {} skipped, {} failed",
            report.index,
            report.source,
            report.frames.len(),
            report.skipped.len(),
            report.failures.len()
        );

        report
    }
}
