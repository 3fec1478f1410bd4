use tracing::debug;

use crate::client::TextGenerator;
use crate::error::{Result, ZritelError};
use crate::format::join_transcript;
use crate::provider::ModelConfig;
use crate::types::{
    GenerationRequest, SamplingOptions, StructuredQuality, TranscriptSegment, VideoMetadata,
};

/// Field names the structuring stage must produce. Anything short of the
/// full set fails the whole analysis; no defaults are synthesized.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "clickbaitScore",
    "contentValue",
    "fluffPercentage",
    "keyIssues",
    "skipSections",
    "verdict",
];

fn analysis_prompt(meta: &VideoMetadata, transcript_text: &str) -> String {
    format!(
        r#"Analyze this YouTube video comprehensively but write a very concise summary. Keep your final analysis under 500 characters total:

Title: {title}
Description: {description}
Full Transcript: {transcript}

Focus only on:
1. Is the title clickbait or honest?
2. Estimated percentage of substantial vs filler content
3. Key issues or misleading elements
4. 1-2 timestamped sections to skip
5. Overall value assessment

Keep your response under 500 characters."#,
        title = meta.title,
        description = meta.description,
        transcript = transcript_text
    )
}

fn structuring_prompt(analysis: &str) -> String {
    format!(
        r#"<s>[INST]Convert this video analysis to JSON format. Output ONLY the JSON object, no other text:

Analysis: {analysis}

Required JSON structure:
{{
  "clickbaitScore": (number between 0-100),
  "contentValue": (string, one of: "low", "medium", "high"),
  "fluffPercentage": (number between 0-100),
  "keyIssues": (array of strings),
  "skipSections": (array of objects with format {{"time": "MM:SS", "reason": "string"}}),
  "verdict": (string summary)
}}[/INST]</s>"#
    )
}

/// Run the two-stage extraction: a free-text analysis pass first, then a
/// near-deterministic structuring pass over the analysis text alone. The
/// transcript is not re-sent to the second stage.
pub async fn analyze<G: TextGenerator>(
    client: &G,
    models: &ModelConfig,
    meta: &VideoMetadata,
    transcript: &[TranscriptSegment],
) -> Result<(String, StructuredQuality)> {
    let transcript_text = join_transcript(transcript);

    let analysis = client
        .generate(&GenerationRequest::new(
            models.analysis_model.as_str(),
            analysis_prompt(meta, &transcript_text),
            SamplingOptions {
                temperature: 0.7,
                num_predict: 512,
            },
        ))
        .await?;
    debug!(chars = analysis.len(), "free-text analysis complete");

    let structured_text = client
        .generate(
            &GenerationRequest::new(
                models.structuring_model.as_str(),
                structuring_prompt(&analysis),
                SamplingOptions {
                    temperature: 0.1,
                    num_predict: 1024,
                },
            )
            .json_format(),
        )
        .await?;

    let structured = validate_structured(&structured_text)?;
    Ok((analysis, structured))
}

/// Parse and validate the structuring stage's output, fail closed. Presence
/// of all six required fields is checked on the raw object before any
/// deserialization; a non-object value counts as everything missing.
pub fn validate_structured(text: &str) -> Result<StructuredQuality> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let missing: Vec<String> = match value.as_object() {
        Some(object) => REQUIRED_FIELDS
            .iter()
            .filter(|field| !object.contains_key(**field))
            .map(|field| field.to_string())
            .collect(),
        None => REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
    };

    if !missing.is_empty() {
        return Err(ZritelError::MissingFields { missing });
    }

    Ok(serde_json::from_value(value)?)
}
