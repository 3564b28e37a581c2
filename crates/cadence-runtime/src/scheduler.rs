//! The loop controller: lifecycle operations and the scheduler thread
//!
//! `GameLoop` owns a boxed [`Game`] and drives it from a dedicated thread: a
//! fixed-timestep accumulator converts wall time into simulation ticks, each
//! tick invokes `update`, and every iteration that produced at least one tick
//! renders, requests a redraw from the surface, refreshes the FPS estimate,
//! and clears the input tracker's per-frame latches.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cadence_core::{CadenceError, LoopConfig, Result};

use crate::clock::TickClock;
use crate::fps::FpsEstimator;
use crate::game::{Game, NullSurface, Surface};
use crate::input::InputTracker;

/// How long `stop()` waits for the scheduler thread before reporting a defect
pub const STOP_GRACE: Duration = Duration::from_secs(2);

/// Sleep per scheduler iteration. Keeps the loop responsive to flag changes
/// without pegging a core; never a timing source — the clock measures.
const LOOP_SLEEP: Duration = Duration::from_millis(1);

/// Flags and measurements shared between the controller and its thread
struct SharedState {
    running: AtomicBool,
    paused: AtomicBool,
    /// Smoothed FPS estimate, stored as `f64` bits
    fps_bits: AtomicU64,
}

impl SharedState {
    fn new(initial_fps: f64) -> Self {
        Self {
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            fps_bits: AtomicU64::new(initial_fps.to_bits()),
        }
    }

    fn set_fps(&self, fps: f64) {
        self.fps_bits.store(fps.to_bits(), Ordering::Release);
    }

    fn fps(&self) -> f64 {
        f64::from_bits(self.fps_bits.load(Ordering::Acquire))
    }
}

/// What the scheduler thread hands back at join time: the boxed game (so a
/// restart reuses the same host object) and how the loop ended.
type SchedulerExit = (Box<dyn Game>, Result<()>);

/// Lifecycle control over the fixed-timestep scheduler thread
pub struct GameLoop {
    config: LoopConfig,
    shared: Arc<SharedState>,
    input: Arc<InputTracker>,
    surface: Arc<dyn Surface>,
    game: Option<Box<dyn Game>>,
    handle: Option<JoinHandle<SchedulerExit>>,
}

impl GameLoop {
    /// Build a controller for `game`, presenting through `surface`
    pub fn new(config: LoopConfig, game: Box<dyn Game>, surface: Arc<dyn Surface>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(SharedState::new(config.tick_rate())),
            input: Arc::new(InputTracker::new()),
            surface,
            game: Some(game),
            config,
            handle: None,
        })
    }

    /// Build a controller with no presentation surface
    pub fn headless(config: LoopConfig, game: Box<dyn Game>) -> Result<Self> {
        Self::new(config, game, Arc::new(NullSurface))
    }

    /// Start the scheduler thread
    ///
    /// Idempotent while the thread is alive. If a previous run ended on its
    /// own (host callback failure or panic), that outcome is surfaced here
    /// rather than silently discarded. Also requests input focus for the
    /// surface as a convenience.
    pub fn start(&mut self) -> Result<()> {
        if let Some(handle) = &self.handle {
            if !handle.is_finished() {
                return Ok(());
            }
            self.reap()?;
        }
        self.config.validate()?;
        let game = self
            .game
            .take()
            .ok_or_else(|| CadenceError::GameError("game lost to a panicked scheduler".into()))?;

        self.surface.request_focus();
        self.shared.paused.store(false, Ordering::Release);
        self.shared.set_fps(self.config.tick_rate());
        self.shared.running.store(true, Ordering::Release);

        let config = self.config.clone();
        let shared = Arc::clone(&self.shared);
        let input = Arc::clone(&self.input);
        let surface = Arc::clone(&self.surface);
        self.handle = Some(thread::spawn(move || {
            run_scheduler(config, game, shared, input, surface)
        }));
        Ok(())
    }

    /// Stop the scheduler thread and wait for it to exit
    ///
    /// A benign no-op if the loop was never started. The join is bounded by
    /// [`STOP_GRACE`]; a thread that fails to exit in time is a defect,
    /// reported as [`CadenceError::StopTimeout`] rather than hung on. Host
    /// callback failures from the finished run are returned here.
    pub fn stop(&mut self) -> Result<()> {
        self.shared.running.store(false, Ordering::Release);
        let Some(handle) = &self.handle else {
            return Ok(());
        };

        let deadline = Instant::now() + STOP_GRACE;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                return Err(CadenceError::StopTimeout(STOP_GRACE));
            }
            thread::sleep(LOOP_SLEEP);
        }
        self.reap()
    }

    /// Pause the simulation without stopping the thread. Time spent paused
    /// is discarded, not owed as ticks after resume. Benign when stopped.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::Release);
    }

    /// Resume a paused simulation. Benign when stopped or not paused.
    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::Release);
    }

    /// Is the scheduler thread alive and not asked to stop?
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// The smoothed FPS estimate, readable from any thread
    pub fn fps(&self) -> f64 {
        self.shared.fps()
    }

    /// Handle to the input tracker, for the host's raw-event delivery path
    /// and for queries during `update`/`render`
    pub fn input(&self) -> Arc<InputTracker> {
        Arc::clone(&self.input)
    }

    /// Discard all input history (e.g. on focus loss)
    pub fn reset_input(&self) {
        self.input.reset();
    }

    /// Ask the surface to direct input events this way
    pub fn request_input_focus(&self) {
        self.surface.request_focus();
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Retarget the tick rate; takes effect on the next `start()`
    pub fn set_tick_rate(&mut self, hz: f64) -> Result<()> {
        self.config.set_tick_rate(hz)
    }

    /// Set the fixed step directly; takes effect on the next `start()`
    pub fn set_fixed_step(&mut self, seconds: f64) -> Result<()> {
        self.config.set_fixed_step(seconds)
    }

    /// Set the FPS smoothing factor; takes effect on the next `start()`
    pub fn set_fps_smoothing(&mut self, smoothing: f64) -> Result<()> {
        self.config.set_fps_smoothing(smoothing)
    }

    /// Join a finished scheduler thread, recovering the boxed game and
    /// surfacing any stored host error
    fn reap(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok((game, result)) => {
                    self.game = Some(game);
                    result?;
                }
                Err(_) => return Err(CadenceError::SchedulerPanicked),
            }
        }
        Ok(())
    }
}

fn run_scheduler(
    config: LoopConfig,
    mut game: Box<dyn Game>,
    shared: Arc<SharedState>,
    input: Arc<InputTracker>,
    surface: Arc<dyn Surface>,
) -> SchedulerExit {
    let result = drive_loop(&config, game.as_mut(), &shared, &input, surface.as_ref());
    // A host failure ends the loop on its own; lower the flag so
    // `is_running()` and a waiting `stop()` see the thread is done.
    shared.running.store(false, Ordering::Release);
    (game, result)
}

fn drive_loop(
    config: &LoopConfig,
    game: &mut dyn Game,
    shared: &SharedState,
    input: &InputTracker,
    surface: &dyn Surface,
) -> Result<()> {
    game.start()?;

    let mut clock = TickClock::new(config.fixed_step);
    let mut fps = FpsEstimator::new(config.fps_smoothing, config.tick_rate());
    let mut frame_anchor = Instant::now();

    while shared.running.load(Ordering::Acquire) {
        if shared.paused.load(Ordering::Acquire) {
            clock.discard_debt();
            frame_anchor = Instant::now();
        } else {
            let ticks = clock.advance();
            for _ in 0..ticks {
                game.update(config.fixed_step)?;
            }
            if ticks > 0 {
                game.render()?;
                surface.request_redraw();

                let now = Instant::now();
                fps.record(now.duration_since(frame_anchor).as_secs_f64());
                frame_anchor = now;
                shared.set_fps(fps.fps());

                input.end_frame();
            }
        }
        thread::sleep(LOOP_SLEEP);
    }
    Ok(())
}
