use futures::{StreamExt, stream};
use tracing::warn;

use crate::client::TextGenerator;
use crate::error::Result;
use crate::format::join_transcript;
use crate::provider::ModelConfig;
use crate::quality;
use crate::segment::{bucket_transcript, compute_windows};
use crate::types::{
    AnalysisResult, ChapterMark, ChapterSummary, ChapterWindow, GenerationRequest,
    SamplingOptions, TranscriptSegment, VideoMetadata,
};

static FULL_SUMMARY_INSTRUCTION: &str = "Provide a comprehensive summary of this YouTube video transcript. Break down the main topics, key points, and important takeaways. Structure the summary in a clear and readable format.";

/// Dispatch policy for batch operations.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Maximum in-flight generation requests during chapter summarization.
    /// The default of 1 keeps dispatch strictly sequential, bounding load on
    /// the generation service to one request at a time.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Orchestrator over an injected [`TextGenerator`]. Each operation is
/// single-shot: request, generation, result or error. Nothing is retried
/// and nothing persists between invocations.
pub struct AnalysisPipeline<G> {
    client: G,
    models: ModelConfig,
    options: PipelineOptions,
}

impl<G: TextGenerator> AnalysisPipeline<G> {
    pub fn new(client: G, models: ModelConfig) -> Self {
        Self {
            client,
            models,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(client: G, models: ModelConfig, options: PipelineOptions) -> Self {
        Self {
            client,
            models,
            options,
        }
    }

    async fn summarize(&self, text: &str, instruction: &str) -> Result<String> {
        let prompt = format!("{}\n\nText to summarize:\n{}", instruction, text);
        self.client
            .generate(&GenerationRequest::new(
                self.models.analysis_model.as_str(),
                prompt,
                SamplingOptions {
                    temperature: 0.7,
                    num_predict: 1024,
                },
            ))
            .await
    }

    async fn summarize_window(
        &self,
        transcript: &[TranscriptSegment],
        window: &ChapterWindow,
    ) -> Result<ChapterSummary> {
        let chapter_text = join_transcript(&bucket_transcript(transcript, window));
        let instruction = format!(
            "Summarize this chapter of a YouTube video titled \"{}\". Focus on the main points and key information. Keep the summary concise but informative.",
            window.title
        );
        let summary = self.summarize(&chapter_text, &instruction).await?;

        Ok(ChapterSummary {
            chapter: window.title.clone(),
            timestamp: window.raw_time.clone(),
            summary,
        })
    }

    /// Summarize each chapter in mark order. A failing chapter is logged and
    /// dropped from the result; the rest of the batch still completes.
    /// Dispatch stays in chapter order, bounded by
    /// [`PipelineOptions::concurrency`].
    pub async fn summarize_by_chapter(
        &self,
        transcript: &[TranscriptSegment],
        marks: &[ChapterMark],
    ) -> Result<AnalysisResult> {
        let windows = compute_windows(marks);

        let outcomes = stream::iter(windows.iter().map(move |window| async move {
            (window, self.summarize_window(transcript, window).await)
        }))
        .buffered(self.options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        let mut summaries = Vec::with_capacity(outcomes.len());
        for (window, outcome) in outcomes {
            match outcome {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    warn!(chapter = %window.title, error = %e, "dropping failed chapter summary");
                }
            }
        }

        Ok(AnalysisResult::ChapterSummaries { summaries })
    }

    /// Summarize the whole transcript in one call. Failures propagate
    /// unmodified; there is nothing to isolate here.
    pub async fn summarize_full(&self, transcript: &[TranscriptSegment]) -> Result<AnalysisResult> {
        let full_text = join_transcript(transcript);
        let summary = self.summarize(&full_text, FULL_SUMMARY_INSTRUCTION).await?;

        Ok(AnalysisResult::FullSummary { summary })
    }

    /// Run the two-stage content-quality analysis. A failure at either stage
    /// or at validation propagates; there is no partial or degraded output.
    pub async fn analyze_content_quality(
        &self,
        meta: &VideoMetadata,
        transcript: &[TranscriptSegment],
    ) -> Result<AnalysisResult> {
        let (analysis, structured) =
            quality::analyze(&self.client, &self.models, meta, transcript).await?;

        Ok(AnalysisResult::ContentQuality {
            analysis,
            structured,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::error::ZritelError;

    struct ScriptedGenerator {
        responses: Mutex<VecDeque<std::result::Result<String, String>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<std::result::Result<String, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.prompt.clone())
                .collect()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            match self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra generation call")
            {
                Ok(text) => Ok(text),
                Err(message) => Err(ZritelError::GenerationFailed { message }),
            }
        }
    }

    fn transcript() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment {
                text: "intro talk".to_string(),
                timestamp: 0.0,
            },
            TranscriptSegment {
                text: "more intro".to_string(),
                timestamp: 5.0,
            },
            TranscriptSegment {
                text: "the middle part".to_string(),
                timestamp: 10.0,
            },
            TranscriptSegment {
                text: "closing thoughts".to_string(),
                timestamp: 20.0,
            },
        ]
    }

    fn marks() -> Vec<ChapterMark> {
        vec![
            ChapterMark {
                title: "Intro".to_string(),
                timestamp: 0.0,
                raw_time: "0:00".to_string(),
            },
            ChapterMark {
                title: "Middle".to_string(),
                timestamp: 10.0,
                raw_time: "0:10".to_string(),
            },
            ChapterMark {
                title: "Outro".to_string(),
                timestamp: 20.0,
                raw_time: "0:20".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn chapter_prompts_embed_only_that_chapters_text() {
        let client = ScriptedGenerator::new(vec![
            Ok("s1".to_string()),
            Ok("s2".to_string()),
            Ok("s3".to_string()),
        ]);
        let pipeline = AnalysisPipeline::new(client, ModelConfig::default());

        pipeline
            .summarize_by_chapter(&transcript(), &marks())
            .await
            .unwrap();

        let prompts = pipeline.client.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("intro talk more intro"));
        assert!(!prompts[0].contains("the middle part"));
        assert!(prompts[1].contains("the middle part"));
        assert!(prompts[2].contains("closing thoughts"));
        assert!(prompts[0].contains("titled \"Intro\""));
    }

    #[tokio::test]
    async fn failing_chapter_is_dropped_without_aborting_the_batch() {
        let client = ScriptedGenerator::new(vec![
            Ok("first".to_string()),
            Err("model exploded".to_string()),
            Ok("third".to_string()),
        ]);
        let pipeline = AnalysisPipeline::new(client, ModelConfig::default());

        let result = pipeline
            .summarize_by_chapter(&transcript(), &marks())
            .await
            .unwrap();

        let AnalysisResult::ChapterSummaries { summaries } = result else {
            panic!("expected chapter summaries");
        };
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].chapter, "Intro");
        assert_eq!(summaries[0].summary, "first");
        assert_eq!(summaries[1].chapter, "Outro");
        assert_eq!(summaries[1].summary, "third");
    }

    #[tokio::test]
    async fn default_dispatch_is_sequential_in_mark_order() {
        let client = ScriptedGenerator::new(vec![
            Ok("a".to_string()),
            Ok("b".to_string()),
            Ok("c".to_string()),
        ]);
        let pipeline = AnalysisPipeline::new(client, ModelConfig::default());

        pipeline
            .summarize_by_chapter(&transcript(), &marks())
            .await
            .unwrap();

        let prompts = pipeline.client.prompts();
        assert!(prompts[0].contains("Intro"));
        assert!(prompts[1].contains("Middle"));
        assert!(prompts[2].contains("Outro"));
    }

    #[tokio::test]
    async fn bounded_concurrency_keeps_results_in_chapter_order() {
        let client = ScriptedGenerator::new(vec![
            Ok("a".to_string()),
            Ok("b".to_string()),
            Ok("c".to_string()),
        ]);
        let pipeline = AnalysisPipeline::with_options(
            client,
            ModelConfig::default(),
            PipelineOptions { concurrency: 3 },
        );

        let result = pipeline
            .summarize_by_chapter(&transcript(), &marks())
            .await
            .unwrap();

        let AnalysisResult::ChapterSummaries { summaries } = result else {
            panic!("expected chapter summaries");
        };
        let titles: Vec<&str> = summaries.iter().map(|s| s.chapter.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Middle", "Outro"]);
    }

    #[tokio::test]
    async fn no_marks_yield_an_empty_batch() {
        let client = ScriptedGenerator::new(vec![]);
        let pipeline = AnalysisPipeline::new(client, ModelConfig::default());

        let result = pipeline
            .summarize_by_chapter(&transcript(), &[])
            .await
            .unwrap();

        let AnalysisResult::ChapterSummaries { summaries } = result else {
            panic!("expected chapter summaries");
        };
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn full_summary_failure_propagates() {
        let client = ScriptedGenerator::new(vec![Err("boom".to_string())]);
        let pipeline = AnalysisPipeline::new(client, ModelConfig::default());

        let outcome = pipeline.summarize_full(&transcript()).await;
        match outcome {
            Err(ZritelError::GenerationFailed { message }) => assert_eq!(message, "boom"),
            other => panic!("expected GenerationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn full_summary_embeds_the_whole_transcript() {
        let client = ScriptedGenerator::new(vec![Ok("the summary".to_string())]);
        let pipeline = AnalysisPipeline::new(client, ModelConfig::default());

        let result = pipeline.summarize_full(&transcript()).await.unwrap();
        let AnalysisResult::FullSummary { summary } = result else {
            panic!("expected full summary");
        };
        assert_eq!(summary, "the summary");

        let prompts = pipeline.client.prompts();
        assert!(prompts[0].contains("intro talk more intro the middle part closing thoughts"));
    }

    #[test]
    fn results_serialize_with_their_type_tags() {
        let result = AnalysisResult::ChapterSummaries {
            summaries: vec![ChapterSummary {
                chapter: "Intro".to_string(),
                timestamp: "0:00".to_string(),
                summary: "s".to_string(),
            }],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "chapter_summaries");
        assert_eq!(value["summaries"][0]["chapter"], "Intro");

        let full = AnalysisResult::FullSummary {
            summary: "s".to_string(),
        };
        assert_eq!(serde_json::to_value(&full).unwrap()["type"], "full_summary");
    }
}
