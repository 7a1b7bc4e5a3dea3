//! Internal utility libraries for the compilation engine.
//!
//! `sc-ore` is meant to be a thin extension of the standard library, in the
//! same spirit as the teacher crate it is modeled on: small, dependency-light
//! helpers (named task spawning, a grow-only concurrent arena, id generation)
//! that every other crate in this workspace pulls in rather than
//! reimplementing.

pub mod arena;
pub mod id;
pub mod metrics;
pub mod task;
