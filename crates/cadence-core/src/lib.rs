//! Cadence Core - Foundational types for the Cadence loop controller
//!
//! This crate provides the types the runtime and its consumers depend on:
//! - `LoopConfig` - Tick rate and FPS smoothing configuration
//! - Error types and Result alias

mod config;
mod error;

pub use config::{LoopConfig, DEFAULT_FPS_SMOOTHING, DEFAULT_TICK_RATE};
pub use error::{CadenceError, Result};
