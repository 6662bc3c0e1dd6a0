//! Shared data models for the ad generation pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Product metadata scraped from product pages
//! - Video generation requests and provider job state
//! - Ad scripts drafted by the agent
//! - Recorded run output

pub mod job;
pub mod output;
pub mod product;
pub mod request;
pub mod script;

// Re-export common types
pub use job::{CompletedJob, JobHandle, JobStatus, PollOutcome, ProviderKind, TransitionError};
pub use output::{Artifact, GenerationOutput, VideoOutcome};
pub use product::ProductMetadata;
pub use request::{
    AspectRatio, DurationError, GenerationRequest, QualityTier, VideoDuration, VideoResolution,
};
pub use script::{AdScene, AdScript};
