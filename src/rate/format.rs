//! Human-facing renderings of stream statistics.

use serde::Serialize;

/// Renders a bytes/sec figure as kilobytes per second, e.g. `12.50KB/S`.
///
/// `None` means no window has closed yet.
pub fn format_rate(bytes_per_sec: Option<f64>) -> String {
    match bytes_per_sec {
        Some(rate) => format!("{:.2}KB/S", rate / 1024.0),
        None => "0 KB/S".to_string(),
    }
}

/// Coarse playback smoothness bucket derived from frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameRateStatus {
    Poor = 0,
    Fair = 1,
    Good = 2,
}

impl FrameRateStatus {
    pub fn from_fps(fps: f64) -> Self {
        if fps >= 24.0 {
            Self::Good
        } else if fps >= 15.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}
