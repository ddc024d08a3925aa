//! CLI commands

pub mod organize;
