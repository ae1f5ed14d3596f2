// Cross-cutting concerns: errors, settings, logging setup.

pub mod config;
pub mod error;
pub mod logging;
