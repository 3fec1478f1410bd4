use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::fs;
use tracing_subscriber::{EnvFilter, fmt};

use zritel_core::{
    AnalysisPipeline, AnalysisResult, ChapterMark, ModelConfig, OllamaClient, PipelineOptions,
    TranscriptSegment, VideoMetadata, format_result_readable, parse_clock_or_zero,
};

/// Scraped transcript line: raw clock text plus the spoken text.
#[derive(Deserialize)]
struct RawSegment {
    time: String,
    text: String,
}

/// Scraped chapter mark: raw clock text plus the chapter title.
#[derive(Deserialize)]
struct RawChapter {
    time: String,
    title: String,
}

#[derive(Parser)]
#[command(name = "zritel")]
#[command(
    about = "Summarize video transcripts and score content quality with a local Ollama endpoint"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Generation endpoint base URL (defaults to ZRITEL_BASE_URL or localhost)
    #[arg(long)]
    base_url: Option<String>,

    /// Model used for summaries and free-text analysis
    #[arg(long)]
    analysis_model: Option<String>,

    /// Model used for schema-constrained structuring
    #[arg(long)]
    structuring_model: Option<String>,

    /// Print the tagged result as JSON instead of readable text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TranscriptInput {
    /// Transcript JSON file: [{"time": "0:05", "text": "..."}, ...]
    #[arg(short, long)]
    transcript: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize each chapter of the video separately
    Chapters {
        #[command(flatten)]
        input: TranscriptInput,

        /// Chapter marks JSON file: [{"time": "0:00", "title": "..."}, ...]
        #[arg(short, long)]
        chapters: PathBuf,

        /// Maximum in-flight generation requests (1 = strictly sequential)
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
    },
    /// Summarize the whole transcript in one pass
    Full {
        #[command(flatten)]
        input: TranscriptInput,
    },
    /// Score clickbait, fluff and overall content value
    Quality {
        #[command(flatten)]
        input: TranscriptInput,

        /// Video title
        #[arg(long, default_value = "")]
        title: String,

        /// Video description
        #[arg(long, default_value = "")]
        description: String,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

async fn load_transcript(path: &Path) -> Result<Vec<TranscriptSegment>> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading transcript {}", path.display()))?;
    let segments: Vec<RawSegment> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing transcript {}", path.display()))?;

    Ok(segments
        .into_iter()
        .map(|seg| TranscriptSegment {
            timestamp: parse_clock_or_zero(&seg.time),
            text: seg.text,
        })
        .collect())
}

async fn load_chapters(path: &Path) -> Result<Vec<ChapterMark>> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading chapters {}", path.display()))?;
    let chapters: Vec<RawChapter> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing chapters {}", path.display()))?;

    Ok(chapters
        .into_iter()
        .map(|chapter| ChapterMark {
            timestamp: parse_clock_or_zero(&chapter.time),
            title: chapter.title,
            raw_time: chapter.time,
        })
        .collect())
}

fn finish_step(spinner: ProgressBar, ok: bool, done_msg: &str) {
    if ok {
        spinner.finish_with_message(format!("{} {}", style("✓").green().bold(), done_msg));
    } else {
        spinner.finish_and_clear();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let mut models = ModelConfig::from_env();
    if let Some(base_url) = cli.base_url {
        models.base_url = base_url;
    }
    if let Some(model) = cli.analysis_model {
        models.analysis_model = model;
    }
    if let Some(model) = cli.structuring_model {
        models.structuring_model = model;
    }

    let client = OllamaClient::new(models.base_url.clone());

    println!(
        "\n{}  {}\n",
        style("zritel").cyan().bold(),
        style("Transcript Analyzer").dim()
    );

    let outcome = match cli.command {
        Command::Chapters {
            input,
            chapters,
            concurrency,
        } => {
            let transcript = load_transcript(&input.transcript).await?;
            let marks = load_chapters(&chapters).await?;
            let pipeline =
                AnalysisPipeline::with_options(client, models, PipelineOptions { concurrency });

            let spinner = create_spinner(&format!("Summarizing {} chapters...", marks.len()));
            let outcome = pipeline.summarize_by_chapter(&transcript, &marks).await;
            finish_step(spinner, outcome.is_ok(), "Chapter summaries generated");
            outcome
        }
        Command::Full { input } => {
            let transcript = load_transcript(&input.transcript).await?;
            let pipeline = AnalysisPipeline::new(client, models);

            let spinner = create_spinner("Summarizing full transcript...");
            let outcome = pipeline.summarize_full(&transcript).await;
            finish_step(spinner, outcome.is_ok(), "Summary generated");
            outcome
        }
        Command::Quality {
            input,
            title,
            description,
        } => {
            let transcript = load_transcript(&input.transcript).await?;
            let meta = VideoMetadata { title, description };
            let pipeline = AnalysisPipeline::new(client, models);

            let spinner = create_spinner("Analyzing content quality...");
            let outcome = pipeline.analyze_content_quality(&meta, &transcript).await;
            finish_step(spinner, outcome.is_ok(), "Content quality analyzed");
            outcome
        }
    };

    let result: AnalysisResult = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", format_result_readable(&result));
    }

    Ok(())
}
