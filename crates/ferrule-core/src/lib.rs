//! Ferrule Core
//!
//! Ambient utilities shared by the Ferrule crates: logging setup, profiling
//! hooks, configuration and hash collections.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;
