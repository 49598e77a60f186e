//! Command implementations

pub mod graph;
