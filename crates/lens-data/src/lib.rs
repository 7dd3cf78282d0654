//! Data layer for habit-lens.
//!
//! Parses usage CSV logs, Apple Health exports and the auxiliary download
//! and browser histories into normalized records, then groups, joins and
//! correlates them into the tables behind each analysis view.

pub mod aggregator;
pub mod analysis;
pub mod correlator;
pub mod export;
pub mod health;
pub mod impact;
pub mod reader;
pub mod roi;
pub mod table;

pub use lens_core as core;
