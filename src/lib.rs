//! Orrery - animated solar system
//!
//! Keplerian orbits, procedurally synthesized body appearances and an
//! analytic star surface, with a thin Bevy scene on top.

pub mod animator;
pub mod bodies;
pub mod orbit;
pub mod scene;
pub mod texture;
pub mod time;
pub mod types;
