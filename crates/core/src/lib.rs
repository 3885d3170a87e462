//! Vidlens Core Library
//!
//! Stages an uploaded video, hands it to the Gemini File API, waits for
//! processing and asks a Gemini model about it.

pub mod agent;
pub mod config;
pub mod error;
pub mod format;
pub mod gemini;
pub mod media;
pub mod poll;
pub mod processor;
pub mod progress;
pub mod prompt;
pub mod staging;
pub mod workflow;

pub use agent::{AgentConfig, AgentResponse, ReasoningAgent, Tool};
pub use config::Settings;
pub use error::{ErrorKind, Result, VidlensError};
pub use format::{format_analysis, format_duration};
pub use gemini::GeminiClient;
pub use media::{FileState, MediaHandle, UploadedVideo, VideoFormat};
pub use poll::{PollOutcome, PollPolicy, poll_until_ready};
pub use processor::MediaProcessor;
pub use progress::{Progress, Reporter, SilentReporter};
pub use prompt::build_analysis_prompt;
pub use staging::StagedVideo;
pub use workflow::{Analysis, AnalysisRequest, Outcome, Workflow};
