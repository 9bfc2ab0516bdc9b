//! BetSeer
//!
//! Scores betting opportunities: signals are normalized and combined into a
//! confidence, sized with the Kelly criterion, tiered by risk and ranked.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod markets;
pub mod monitoring;
pub mod signals;

pub use error::{BetSeerError, Result};
