//! Shared types for tasklog: task records, the error taxonomy, time-range
//! and file-name date parsing, series statistics, the chart renderer seam
//! and CLI settings.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod render;
pub mod settings;
pub mod time_utils;
