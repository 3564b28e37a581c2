//! Cadence Runtime - Fixed-timestep loop infrastructure
//!
//! Provides the loop controller building blocks:
//! - `TickClock` — fixed-timestep accumulator, measured in ticks
//! - `FpsEstimator` — smoothed measurement of realized frame cadence
//! - `InputTracker` — frame-accurate keyboard and pointer state
//! - `Game` / `Surface` — the contracts a host supplies
//! - `GameLoop` — start/stop/pause/resume control over the scheduler thread

mod clock;
mod fps;
mod game;
mod input;
mod scheduler;

pub use clock::TickClock;
pub use fps::FpsEstimator;
pub use game::{Game, NullSurface, Surface};
pub use input::{InputTracker, PointerButton};
pub use scheduler::{GameLoop, STOP_GRACE};
