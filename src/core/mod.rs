pub mod agents;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod store;
