pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::ResearchError;
pub use pipeline::{ResearchContext, run_deep_research, run_quick_research};
pub use types::report::{QuickResearchReport, ResearchReport};
pub use types::request::ResearchRequest;
