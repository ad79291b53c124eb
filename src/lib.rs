//! habitrack - typed habit tracker fields and reminder schedules
//!
//! Two pure engines sit at the core:
//! - [`primitives`]: field definitions, value validation, storage columns
//! - [`schedule`]: schedule normalization and next-due computation
//!
//! [`tracker`] builds trackers, entries and reminder jobs on top of them.

pub mod cli;
pub mod config;
pub mod observability;
pub mod primitives;
pub mod schedule;
pub mod tracker;
