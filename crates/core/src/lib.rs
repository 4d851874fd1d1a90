//! Core settlement logic for Dutch.
//!
//! This crate contains pure settlement logic with ZERO I/O dependencies.
//! Requests come in as values, results go out as values; reading files,
//! configuration and printing belong to the binaries.
//!
//! # Modules
//!
//! - `roster` - Participant list parsing and lookup
//! - `settlement` - Request editing, validation and the allocation engine
//! - `report` - Chat and summary text renderings of a result

pub mod report;
pub mod roster;
pub mod settlement;

pub use roster::Roster;
pub use settlement::{
    SettlementEngine, SettlementRequest, SettlementResult, SettlementService, ValidationReport,
};
