//! Chart rendering for tasklog.
//!
//! Provides the shared chart geometry, an interactive terminal chart built on
//! [`ratatui`], and an SVG renderer for saving the chart to disk. Both
//! renderers implement [`tasklog_core::render::ChartRenderer`].

pub mod chart;
pub mod svg;
pub mod terminal;
pub mod themes;

pub use tasklog_core as core;
