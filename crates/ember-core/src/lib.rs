//! Ember Core - Foundational types for the Ember particle engine
//!
//! This crate provides the types that all other Ember crates depend on:
//! - `Vec2` - 2D positions, velocities and variances
//! - `Color4` - Float RGBA colors and their per-second deltas
//! - Error types and Result alias

mod error;
mod types;

pub use error::{EmberError, Result};
pub use types::{Color4, Vec2};
