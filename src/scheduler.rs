//! Fixed-timestep game loop
//!
//! Every iteration runs one tick, renders, presents, then sleeps for
//! whatever is left of the period. Time lost to oversleeping is deducted from
//! the next sleep. When the work itself takes longer than a period, the
//! shortfall accumulates as overrun debt and is paid back with extra ticks
//! that are never rendered, at most `max_skipped_ticks` per iteration.
//!
//! The loop runs on its own thread and owns the simulation and the surface.
//! Pause and stop arrive through `LoopControl` and are read once at the top
//! of each iteration.

use std::sync::Arc;
use std::time::Duration;

use crate::error::PresentError;
use crate::platform::control::LoopControl;
use crate::platform::time::Clock;
use crate::renderer::{Canvas, Surface};
use crate::settings::Settings;

/// Whether the loop should keep going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Per-tick information from the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Pause requested; the simulation decides what freezes
    pub paused: bool,
    /// Extra tick paying down overrun debt; no render follows it
    pub catch_up: bool,
}

/// Per-frame information from the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Time since the loop started
    pub elapsed: Duration,
}

/// Something the loop can drive
pub trait Simulation {
    fn tick(&mut self, ctx: TickContext) -> Flow;

    fn render(&mut self, canvas: &mut dyn Canvas, frame: FrameContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub tick_rate: u32,
    pub yield_after_delays: u32,
    pub max_skipped_ticks: u32,
}

impl LoopConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tick_rate: settings.tick_rate,
            yield_after_delays: settings.timing.yield_after_delays,
            max_skipped_ticks: settings.timing.max_skipped_ticks,
        }
    }

    /// Time allotted to one iteration
    pub fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
    }
}

/// What to do once the work of an iteration is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Sleep(Duration),
    /// No time left this period
    Behind { yield_now: bool },
}

/// Pacing state carried between iterations. All values are signed
/// nanoseconds; oversleep goes negative when a sleep ends early.
#[derive(Debug, Clone)]
pub struct LoopClock {
    period: i64,
    overslept: i64,
    overrun: i64,
    delays: u32,
    yield_after: u32,
    max_skips: u32,
}

fn nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

impl LoopClock {
    pub fn new(config: &LoopConfig) -> Self {
        Self {
            period: nanos(config.period()),
            overslept: 0,
            overrun: 0,
            delays: 0,
            yield_after: config.yield_after_delays.max(1),
            max_skips: config.max_skipped_ticks,
        }
    }

    /// Decide how to spend the rest of the period given the time the
    /// tick, render and present took.
    pub fn pace(&mut self, elapsed: Duration) -> Pace {
        let budget = self
            .period
            .saturating_sub(nanos(elapsed))
            .saturating_sub(self.overslept);

        if budget > 0 {
            self.delays = 0;
            Pace::Sleep(Duration::from_nanos(budget as u64))
        } else {
            self.overrun = self.overrun.saturating_sub(budget);
            self.overslept = 0;
            self.delays += 1;

            let yield_now = self.delays >= self.yield_after;
            if yield_now {
                self.delays = 0;
            }
            Pace::Behind { yield_now }
        }
    }

    /// Remember how far the sleep overshot (or undershot) its budget
    pub fn record_sleep(&mut self, budget: Duration, actual: Duration) {
        self.overslept = nanos(actual) - nanos(budget);
    }

    /// Number of unrendered ticks to run now, taken off the overrun debt
    pub fn catch_up_ticks(&mut self) -> u32 {
        let mut skips = 0;
        while self.overrun > self.period && skips < self.max_skips {
            self.overrun -= self.period;
            skips += 1;
        }
        skips
    }

    pub fn overrun(&self) -> Duration {
        Duration::from_nanos(self.overrun.max(0) as u64)
    }

    pub fn overslept_nanos(&self) -> i64 {
        self.overslept
    }
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    /// All ticks, catch-up included
    pub ticks: u64,
    pub catch_up_ticks: u64,
    pub renders: u64,
    /// Iterations where no offscreen canvas was available
    pub skipped_renders: u64,
    /// Frames that failed to present
    pub dropped_frames: u64,
    pub yields: u64,
}

pub struct Scheduler<C: Clock> {
    config: LoopConfig,
    control: Arc<LoopControl>,
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(config: LoopConfig, control: Arc<LoopControl>, clock: C) -> Self {
        Self {
            config,
            control,
            clock,
        }
    }

    /// Run until stopped. Consumes the scheduler: a stopped loop cannot be
    /// restarted.
    pub fn run<S, F>(self, sim: &mut S, surface: &mut F) -> LoopStats
    where
        S: Simulation + ?Sized,
        F: Surface + ?Sized,
    {
        self.control.start();

        let mut pacing = LoopClock::new(&self.config);
        let mut stats = LoopStats::default();
        let started = self.clock.now();
        log::info!(
            "Game loop running at {} ticks/s (period {:?})",
            self.config.tick_rate,
            self.config.period()
        );

        while !self.control.is_stopped() {
            let before = self.clock.now();
            let paused = self.control.is_paused();
            stats.iterations += 1;

            self.tick(sim, TickContext { paused, catch_up: false }, &mut stats);
            let frame = FrameContext {
                elapsed: self.clock.now().saturating_sub(started),
            };
            Self::draw(sim, surface, frame, &mut stats);

            let after = self.clock.now();
            match pacing.pace(after.saturating_sub(before)) {
                Pace::Sleep(budget) => {
                    self.clock.sleep(budget);
                    pacing.record_sleep(budget, self.clock.now().saturating_sub(after));
                }
                Pace::Behind { yield_now } => {
                    if yield_now {
                        log::trace!("Loop behind schedule, yielding");
                        self.clock.yield_now();
                        stats.yields += 1;
                    }
                }
            }

            let skips = pacing.catch_up_ticks();
            if skips > 0 {
                log::trace!(
                    "Catching up {} ticks ({:?} still owed)",
                    skips,
                    pacing.overrun()
                );
            }
            for _ in 0..skips {
                self.tick(sim, TickContext { paused, catch_up: true }, &mut stats);
            }
        }

        log::info!(
            "Game loop stopped: {} iterations, {} ticks ({} catch-up), {} frames rendered, {} dropped",
            stats.iterations,
            stats.ticks,
            stats.catch_up_ticks,
            stats.renders,
            stats.dropped_frames
        );
        stats
    }

    fn tick<S>(&self, sim: &mut S, ctx: TickContext, stats: &mut LoopStats)
    where
        S: Simulation + ?Sized,
    {
        stats.ticks += 1;
        if ctx.catch_up {
            stats.catch_up_ticks += 1;
        }
        if sim.tick(ctx) == Flow::Stop {
            self.control.stop();
        }
    }

    fn draw<S, F>(sim: &mut S, surface: &mut F, frame: FrameContext, stats: &mut LoopStats)
    where
        S: Simulation + ?Sized,
        F: Surface + ?Sized,
    {
        match surface.canvas() {
            Some(canvas) => {
                sim.render(canvas, frame);
                stats.renders += 1;
            }
            None => {
                log::debug!("Offscreen buffer unavailable, skipping render");
                stats.skipped_renders += 1;
            }
        }

        match surface.present() {
            Ok(()) => {}
            Err(PresentError::Unavailable) => {
                log::debug!("Nothing to present, frame dropped");
                stats.dropped_frames += 1;
            }
            Err(e) => {
                log::warn!("Frame dropped: {}", e);
                stats.dropped_frames += 1;
            }
        }
    }
}
