use serde::{Deserialize, Serialize};

/// One line of a video transcript, timestamped in seconds from the start.
/// Segments are assumed ordered by timestamp ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub timestamp: f64,
}

/// A chapter mark as supplied by the chapter-extraction collaborator.
/// `raw_time` keeps the clock text exactly as it appeared at the source; it
/// is redisplayed as-is in results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterMark {
    pub title: String,
    pub timestamp: f64,
    pub raw_time: String,
}

/// A chapter mark extended with the start of the following chapter. The last
/// window's `end` is `f64::INFINITY` so it absorbs all trailing transcript.
#[derive(Debug, Clone)]
pub struct ChapterWindow {
    pub title: String,
    pub raw_time: String,
    pub start: f64,
    pub end: f64,
}

/// Video title and description, input to content-quality analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
}

/// Sampling parameters forwarded to the generation endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

/// One request against `POST /api/generate`. Serializes to the exact wire
/// body the endpoint expects.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub options: SamplingOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
}

impl GenerationRequest {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        options: SamplingOptions,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options,
            format: None,
        }
    }

    /// Ask the service to emit syntactically valid JSON fragments. This
    /// constrains well-formedness only; schema conformance is checked after
    /// decoding.
    pub fn json_format(mut self) -> Self {
        self.format = Some("json");
        self
    }
}

/// One decoded line of the newline-delimited response stream.
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub error: Option<String>,
}

/// Structured content-quality verdict. Serialized names follow the wire
/// schema the structuring stage is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuality {
    pub clickbait_score: f64,
    pub content_value: String,
    pub fluff_percentage: f64,
    pub key_issues: Vec<String>,
    pub skip_sections: Vec<SkipSection>,
    pub verdict: String,
}

/// A timestamped span the analysis suggests skipping. `time` is redisplayed
/// verbatim, not parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipSection {
    pub time: String,
    pub reason: String,
}

/// One chapter's entry in a `chapter_summaries` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub chapter: String,
    pub timestamp: String,
    pub summary: String,
}

/// The tagged outcome of one pipeline operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisResult {
    ChapterSummaries {
        summaries: Vec<ChapterSummary>,
    },
    FullSummary {
        summary: String,
    },
    ContentQuality {
        analysis: String,
        structured: StructuredQuality,
    },
}
