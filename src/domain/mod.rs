//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod position;
pub mod signal;
pub mod returns;
pub mod settings;
pub mod config_validation;
pub mod pipeline;
pub mod error;
