//! Cadence Player - Headless counting demo
//!
//! Drives the loop controller with a game that counts up at one unit per
//! second, rendering by rewriting a console line. Demonstrates fixed-step
//! catch-up, the FPS estimate, and pause/resume debt discard.
//!
//! Usage:
//!   cadence-player [--seconds <n>] [--tick-rate <hz>] [--pause-at <n>]

use anyhow::{Context, Result};
use cadence_core::LoopConfig;
use cadence_runtime::{Game, GameLoop};
use clap::Parser;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cadence-player")]
#[command(about = "Cadence demo - a fixed-timestep counter")]
struct Args {
    /// How long to run, in seconds
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// Simulation tick rate in Hz
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Pause for half a second this many seconds in
    #[arg(long)]
    pause_at: Option<f64>,
}

/// The counting panel of old, minus the panel: one unit per second
struct CountingGame {
    counter: Arc<Mutex<f64>>,
    ticks: Arc<AtomicU64>,
}

impl CountingGame {
    fn counter(&self) -> f64 {
        *self
            .counter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Game for CountingGame {
    fn start(&mut self) -> cadence_core::Result<()> {
        Ok(())
    }

    fn update(&mut self, dt: f64) -> cadence_core::Result<()> {
        *self
            .counter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += dt;
        self.ticks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn render(&mut self) -> cadence_core::Result<()> {
        print!("\r  {:8.2}", self.counter());
        let _ = std::io::stdout().flush();
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = LoopConfig::new();
    config
        .set_tick_rate(args.tick_rate)
        .context("Invalid tick rate")?;

    let counter = Arc::new(Mutex::new(0.0));
    let ticks = Arc::new(AtomicU64::new(0));
    let game = CountingGame {
        counter: Arc::clone(&counter),
        ticks: Arc::clone(&ticks),
    };

    let mut game_loop =
        GameLoop::headless(config, Box::new(game)).context("Failed to build loop controller")?;

    println!(
        "Counting for {:.1}s at {:.0} ticks/s",
        args.seconds, args.tick_rate
    );

    game_loop.start().context("Failed to start loop")?;

    match args.pause_at {
        Some(at) if at > 0.0 && at < args.seconds => {
            std::thread::sleep(Duration::from_secs_f64(at));
            game_loop.pause();
            print!("  [paused]");
            let _ = std::io::stdout().flush();
            std::thread::sleep(Duration::from_millis(500));
            game_loop.resume();
            std::thread::sleep(Duration::from_secs_f64(args.seconds - at));
        }
        _ => std::thread::sleep(Duration::from_secs_f64(args.seconds)),
    }

    let fps = game_loop.fps();
    game_loop.stop().context("Loop ended with an error")?;

    let final_count = *counter.lock().unwrap_or_else(PoisonError::into_inner);
    println!();
    println!("Final count:  {final_count:.2}");
    println!("Ticks run:    {}", ticks.load(Ordering::Relaxed));
    println!("Measured FPS: {fps:.1}");
    Ok(())
}
