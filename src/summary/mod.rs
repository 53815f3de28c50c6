pub mod extractive;
pub mod llm;

pub use extractive::ExtractiveSummarizer;
pub use llm::{ChatMessage, LLMConfig, LLMProvider, LlmSummarizer};

use crate::config::SummaryConfig;
use crate::error::Result;
use crate::selection::Segment;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// Text summarizer used for highlight card captions
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Pick the summarizer for this run.
///
/// The LLM is used only when enabled and its availability probe succeeds;
/// otherwise the extractive summarizer is returned. The choice is made once.
pub async fn create_summarizer(config: &SummaryConfig, llm: &LLMConfig) -> Box<dyn Summarizer> {
    if !config.enable_llm {
        info!("📝 LLM summaries disabled, using extractive summaries");
        return Box::new(ExtractiveSummarizer::new(config.max_chars));
    }

    match LlmSummarizer::new(llm.clone()) {
        Ok(summarizer) if summarizer.is_available().await => {
            info!("🤖 Using {:?} for summaries", summarizer.provider());
            Box::new(summarizer)
        }
        Ok(_) => {
            warn!("LLM provider {:?} is not available, using extractive summaries", llm.provider);
            Box::new(ExtractiveSummarizer::new(config.max_chars))
        }
        Err(e) => {
            warn!("Failed to set up LLM summarizer: {}, using extractive summaries", e);
            Box::new(ExtractiveSummarizer::new(config.max_chars))
        }
    }
}

/// Summarize every segment, in segment order.
///
/// Up to `max_concurrent` requests run at once. A segment whose summary
/// fails falls back to `fallback` for that segment only.
pub async fn summarize_segments(
    summarizer: &dyn Summarizer,
    fallback: &ExtractiveSummarizer,
    segments: &[Segment],
    max_concurrent: usize,
) -> Vec<String> {
    stream::iter(segments)
        .map(|segment| async move {
            match summarizer.summarize(&segment.text).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(
                        "{} summary failed for segment at {:.1}s: {}",
                        summarizer.name(),
                        segment.start,
                        e
                    );
                    fallback.summarize_text(&segment.text)
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await
}
