//! Attendance period resolution and validation engine.
//!
//! Given an employee's shift, approved overtime and attendance records, this
//! crate works out which work period is current at a given instant, whether a
//! hand-off to an adjacent period is pending, and whether check-in or
//! check-out is allowed under the configured grace windows.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
