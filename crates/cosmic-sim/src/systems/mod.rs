//! Systems that run over the pools and ships each frame.
//!
//! Systems are plain functions over borrowed state. They own nothing;
//! pools, ships and scratch buffers live in the engine.

pub mod ambient;
pub mod cleanup;
pub mod impacts;
pub mod integrate;
pub mod ship_ai;
pub mod snapshot;
