//! CLI commands

pub mod aggregate;
pub mod pricing;
pub mod show;
