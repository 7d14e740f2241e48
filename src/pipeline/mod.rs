//! 多阶段调研流水线

pub mod confidence;
pub mod context;
pub mod memory;
pub mod orchestrator;
pub mod phases;

pub use context::ResearchContext;
pub use orchestrator::{run_deep_research, run_quick_research};
