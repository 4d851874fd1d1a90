//! Shared types, errors, and configuration for Dutch.
//!
//! This crate provides common types used across all other crates:
//! - Money amounts, the amount-text parser and the grouped renderer
//! - Application-wide error types
//! - Configuration management, including the settlement policy constants

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ReportConfig, SettlementPolicy};
pub use error::{AppError, AppResult};
pub use types::{Amount, format_amount, parse_amount};
