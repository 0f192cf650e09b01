//! SwimSampler Core — domain types, allocation, selection, provider boundary.
//!
//! This crate contains the heart of the stratified sampler:
//! - Domain types (divisions, teams, swimmers, best times, flat records)
//! - Swim time parsing with a graceful-degradation sentinel
//! - The two-level proportional apportionment engine
//! - Stride and random team selection
//! - Deterministic BLAKE3-derived RNG hierarchy
//! - The `SwimProvider` trait with the SwimCloud HTTP implementation,
//!   circuit breaker, and politeness throttle

pub mod apportion;
pub mod domain;
pub mod provider;
pub mod rng;
pub mod select;
pub mod timeparse;
