//! Ad generation agent.
//!
//! Drafts an ad script and text-to-video prompt with an LLM, then
//! drives the video providers to render and download the ad.

pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod script;

pub use error::{AgentError, AgentResult};
pub use llm::LlmClient;
pub use orchestrator::{Orchestrator, RunOptions};
pub use script::{draft_script, ScriptDraft};
