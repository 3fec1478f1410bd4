//! Zritel Core Library
//!
//! Core functionality for summarizing video transcripts and scoring content
//! quality with a local Ollama-compatible generation endpoint: chapter
//! windowing, the newline-delimited response decoder, and the two-stage
//! structured extraction with fail-closed validation.

pub mod client;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod provider;
pub mod quality;
pub mod segment;
pub mod types;

// Re-export commonly used items at crate root
pub use client::{OllamaClient, TextGenerator, decode_stream};
pub use error::{Result, ZritelError};
pub use format::{
    format_clock, format_result_readable, join_transcript, parse_clock, parse_clock_or_zero,
};
pub use pipeline::{AnalysisPipeline, PipelineOptions};
pub use provider::{DEFAULT_BASE_URL, ModelConfig};
pub use quality::REQUIRED_FIELDS;
pub use segment::{bucket_transcript, compute_windows};
pub use types::{
    AnalysisResult, ChapterMark, ChapterSummary, ChapterWindow, GenerationRequest,
    SamplingOptions, SkipSection, StreamChunk, StructuredQuality, TranscriptSegment, VideoMetadata,
};
