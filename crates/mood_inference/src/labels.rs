use std::path::Path;

use mood_core::Result;

/// Classes of the bundled emotion model, in output order.
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fearful", "happy", "neutral", "sad", "surprised",
];

pub fn emotion_labels() -> Vec<String> {
    EMOTION_LABELS.iter().map(|l| l.to_string()).collect()
}

/// One label per line. Blank lines and `#` comments are skipped.
pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_labels(&text))
}
