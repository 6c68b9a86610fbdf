//! Data models for stateflow

pub mod workflow;

pub use workflow::*;
