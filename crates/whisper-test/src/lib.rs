//! WhisperCircles Test Harness
//!
//! This crate provides:
//! - A seeded session simulator driving random authoring, voting and
//!   membership traffic against a manual clock
//! - Invariant checks over every reachable store state
//! - End-to-end lifecycle scenarios

pub mod simulator;

#[cfg(test)]
mod scenarios;

pub use simulator::*;
