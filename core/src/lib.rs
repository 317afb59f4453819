//! Synthetic customer activity data and the segment-shaded chart built
//! from it.
//!
//! Data flow (fixed):
//!   config → synth (seeded RngBank) → table (+ derived segments)
//!          → filter (customer, date window) → chart (Plotly figure)

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod record;
pub mod rng;
pub mod segment;
pub mod synth;
pub mod table;
pub mod types;
