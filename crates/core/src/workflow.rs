use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::{
    agent::{ReasoningAgent, Tool},
    error::{Result, VidlensError},
    media::MediaHandle,
    poll::{PollOutcome, PollPolicy, poll_until_ready},
    processor::MediaProcessor,
    progress::{Progress, Reporter},
    prompt::build_analysis_prompt,
    staging::StagedVideo,
};

/// One question about one ready video.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub query: String,
    pub media: MediaHandle,
}

impl AnalysisRequest {
    pub fn prompt(&self, web_search: bool) -> String {
        build_analysis_prompt(&self.query, web_search)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub content: String,
    pub display_name: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Analyzed(Analysis),
    /// The query was blank; nothing was sent.
    MissingQuery,
}

/// Upload, wait for processing, then ask the agent.
pub struct Workflow<P: ?Sized, A: ?Sized> {
    processor: Arc<P>,
    agent: Arc<A>,
    policy: PollPolicy,
}

impl<P, A> Workflow<P, A>
where
    P: MediaProcessor + ?Sized,
    A: ReasoningAgent + ?Sized,
{
    pub fn new(processor: Arc<P>, agent: Arc<A>, policy: PollPolicy) -> Self {
        Self {
            processor,
            agent,
            policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run one request. `staged` is consumed and its temp file is gone when this returns.
    pub async fn analyze(
        &self,
        staged: StagedVideo,
        query: &str,
        reporter: &dyn Reporter,
    ) -> Result<Outcome> {
        let span = tracing::info_span!(
            "analyze",
            request_id = %Uuid::new_v4(),
            file = %staged.file_name()
        );

        async move {
            let query = query.trim();
            if query.is_empty() {
                tracing::info!("Empty query, skipping upload");
                return Ok(Outcome::MissingQuery);
            }

            let media = self.upload_and_wait(&staged, reporter).await?;

            let model = self.agent.config().model.clone();
            reporter.report(Progress::Analyzing {
                model: model.clone(),
            });

            let request = AnalysisRequest {
                query: query.to_string(),
                media,
            };
            let prompt = request.prompt(self.agent.config().has_tool(Tool::WebSearch));
            let response = self
                .agent
                .run(&prompt, std::slice::from_ref(&request.media))
                .await?;
            tracing::info!(chars = response.content.len(), "Analysis complete");

            if let Err(e) = staged.cleanup() {
                tracing::warn!(error = %e, "Failed to remove staged video");
            }

            Ok(Outcome::Analyzed(Analysis {
                content: response.content,
                display_name: request.media.display_name,
                model,
            }))
        }
        .instrument(span)
        .await
    }

    async fn upload_and_wait(
        &self,
        staged: &StagedVideo,
        reporter: &dyn Reporter,
    ) -> Result<MediaHandle> {
        reporter.report(Progress::Uploading {
            file_name: staged.file_name().to_string(),
        });

        let handle = self
            .processor
            .upload(
                staged.path(),
                staged.file_name(),
                staged.format().mime_type(),
            )
            .await?;
        tracing::info!(file = %handle.name, state = %handle.state, "Uploaded");

        reporter.report(Progress::Uploaded {
            display_name: handle.display_name.clone(),
        });

        match poll_until_ready(self.processor.as_ref(), handle, self.policy, reporter).await? {
            PollOutcome::Ready(handle) => {
                reporter.report(Progress::Ready);
                Ok(handle)
            }
            PollOutcome::Failed(state) => Err(VidlensError::ProcessingFailed { state }),
            PollOutcome::TimedOut { attempts, waited } => {
                Err(VidlensError::ProcessingTimedOut { attempts, waited })
            }
        }
    }
}
