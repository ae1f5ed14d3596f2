// Main library entry point for decoprof.

pub mod application;
pub mod cli;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod ports;
