use async_trait::async_trait;

use crate::{error::Result, media::MediaHandle};

/// Auxiliary capabilities the reasoning model may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    WebSearch,
}

/// Static agent configuration, built once at start-up and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub name: String,
    pub model: String,
    pub tools: Vec<Tool>,
    pub markdown: bool,
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            name: "Video AI Summarizer".to_string(),
            model: model.into(),
            tools: vec![Tool::WebSearch],
            markdown: true,
        }
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.tools.retain(|t| *t != Tool::WebSearch);
        if enabled {
            self.tools.push(Tool::WebSearch);
        }
        self
    }

    pub fn has_tool(&self, tool: Tool) -> bool {
        self.tools.contains(&tool)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    pub content: String,
}

/// Text (plus media references) in, text out.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    fn config(&self) -> &AgentConfig;

    async fn run(&self, prompt: &str, media: &[MediaHandle]) -> Result<AgentResponse>;
}
