//! CLI command implementations.

pub mod answer;
pub mod baselines;
pub mod facts;
pub mod questions;
pub mod rate;
pub mod summarize;
