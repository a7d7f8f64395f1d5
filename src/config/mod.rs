//! Configuration loading for the attendance engine.
//!
//! The engine's only tunables are its grace windows. They can be loaded from
//! a YAML file or left at their built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//! use attendance_engine::engine::PeriodEngine;
//!
//! let loader = ConfigLoader::load("./config/grace_periods.yaml").unwrap();
//! let engine = PeriodEngine::new(*loader.config());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::GraceConfig;
