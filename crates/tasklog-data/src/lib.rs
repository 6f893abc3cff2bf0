//! Data layer for tasklog.
//!
//! Discovers daily log files, extracts checkbox task lines, persists the
//! intermediate task summary, folds sleep records into per-date totals and
//! runs the extract/report pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod summary;

pub use tasklog_core as core;
