//! startlabx: the agent pipeline behind a founder/talent platform.
//!
//! Role agents (CEO, CTO, PM, frontend, marketing, legal, matchmaker) prompt
//! a generative-text provider and fall back to deterministic templates when
//! the provider is unavailable or unconfigured. Every invocation is logged
//! as a task row; every produced artifact is persisted against its project.

pub mod cli;
pub mod core;
pub mod logging;
