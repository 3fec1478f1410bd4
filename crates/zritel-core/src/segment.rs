use crate::types::{ChapterMark, ChapterWindow, TranscriptSegment};

/// Derive `[start, end)` windows from a chapter mark list. Each window ends
/// where the next chapter begins; the last window's end is `f64::INFINITY`
/// so it absorbs all trailing transcript.
///
/// Marks must already be sorted ascending by timestamp; callers own that
/// ordering and this function does not re-sort.
pub fn compute_windows(marks: &[ChapterMark]) -> Vec<ChapterWindow> {
    marks
        .iter()
        .enumerate()
        .map(|(i, mark)| ChapterWindow {
            title: mark.title.clone(),
            raw_time: mark.raw_time.clone(),
            start: mark.timestamp,
            end: marks
                .get(i + 1)
                .map(|next| next.timestamp)
                .unwrap_or(f64::INFINITY),
        })
        .collect()
}

/// Collect the transcript segments that fall inside one chapter window.
/// An empty bucket is a valid outcome.
pub fn bucket_transcript(
    transcript: &[TranscriptSegment],
    window: &ChapterWindow,
) -> Vec<TranscriptSegment> {
    transcript
        .iter()
        .filter(|seg| seg.timestamp >= window.start && seg.timestamp < window.end)
        .cloned()
        .collect()
}
