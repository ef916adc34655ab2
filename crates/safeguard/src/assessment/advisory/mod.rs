//! Free-text safety advice from an external language model.

mod openai;
mod prompt;

pub use openai::{ChatStreamDecoder, ChatStreamEvent, OpenAiAdvisoryClient};
pub use prompt::AdvisoryPrompt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;

/// Advice text delivered fragment by fragment until the upstream completes.
pub type AdviceStream = BoxStream<'static, Result<String, AdvisoryError>>;

/// Outbound text-generation hook.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn stream_advice(&self, prompt: AdvisoryPrompt) -> Result<AdviceStream, AdvisoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory service is not configured")]
    Disabled,
    #[error("unable to render advisory prompt: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error("advisory transport failed: {0}")]
    Transport(String),
    #[error("advisory upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("malformed advisory stream: {0}")]
    Decode(String),
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAdvisor;

#[async_trait]
impl AdvisoryService for DisabledAdvisor {
    async fn stream_advice(&self, _prompt: AdvisoryPrompt) -> Result<AdviceStream, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }
}

/// Drains a stream into the full advice text.
pub async fn collect_advice(mut stream: AdviceStream) -> Result<String, AdvisoryError> {
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment?);
    }
    Ok(text)
}
