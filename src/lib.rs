//! Compare optimization modes across benchmark timing files.
//!
//! Timing CSVs (one per benchmark, rows of `Optimization,RealTime`) are
//! loaded into a [`model::BenchmarkSet`], turned into [`compute::ChartData`]
//! and drawn as two grouped bar charts: absolute wall-clock time and time
//! relative to a baseline mode.

pub mod compute;
pub mod config;
pub mod duration;
pub mod errors;
pub mod io;
pub mod model;
pub mod observability;
pub mod render;
pub mod runner;
pub mod viewer;
