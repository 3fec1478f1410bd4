use crate::error::{Result, ZritelError};
use crate::types::{AnalysisResult, TranscriptSegment};

/// Parse a clock-style timestamp ("9", "1:02", "1:02:03") into seconds.
/// The rightmost group is seconds; each group to the left is a successive
/// x60 multiplier.
pub fn parse_clock(text: &str) -> Result<f64> {
    let mut seconds = 0.0;
    let mut multiplier = 1.0;

    for group in text.split(':').rev() {
        let value: f64 = group
            .trim()
            .parse()
            .map_err(|_| ZritelError::InvalidClock {
                text: text.to_string(),
            })?;
        seconds += value * multiplier;
        multiplier *= 60.0;
    }

    Ok(seconds)
}

/// Lenient variant for scraped timestamps: a malformed or missing clock
/// counts as 0:00 rather than aborting the caller.
pub fn parse_clock_or_zero(text: &str) -> f64 {
    parse_clock(text).unwrap_or(0.0)
}

/// Format seconds as M:SS, or H:MM:SS from one hour up. The source format is
/// not canonical (variable-width groups), so no round-trip with
/// [`parse_clock`] is claimed.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Join segment texts into the plain transcript text prompts embed.
pub fn join_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|seg| seg.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an analysis result as human-readable markdown.
pub fn format_result_readable(result: &AnalysisResult) -> String {
    let mut output = String::new();

    match result {
        AnalysisResult::ChapterSummaries { summaries } => {
            output.push_str("# Chapter Summaries\n\n");
            for item in summaries {
                output.push_str(&format!("## [{}] {}\n\n", item.timestamp, item.chapter));
                output.push_str(&format!("{}\n\n", item.summary));
            }
        }
        AnalysisResult::FullSummary { summary } => {
            output.push_str("# Video Summary\n\n");
            output.push_str(summary);
            output.push('\n');
        }
        AnalysisResult::ContentQuality { structured, .. } => {
            output.push_str("# Content Quality Analysis\n\n");
            output.push_str(&format!(
                "**Clickbait:** {:.0}/100 | **Value:** {} | **Fluff:** {:.0}%\n\n",
                structured.clickbait_score,
                structured.content_value.to_uppercase(),
                structured.fluff_percentage
            ));

            if !structured.key_issues.is_empty() {
                output.push_str("## Key Issues\n\n");
                for issue in &structured.key_issues {
                    output.push_str(&format!("• {}\n", issue));
                }
                output.push('\n');
            }

            if !structured.skip_sections.is_empty() {
                output.push_str("## Sections to Skip\n\n");
                for skip in &structured.skip_sections {
                    output.push_str(&format!("• **{}** – {}\n", skip.time, skip.reason));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Verdict:** {}\n", structured.verdict));
        }
    }

    output
}
