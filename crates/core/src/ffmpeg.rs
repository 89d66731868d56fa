//! FFmpeg/FFprobe command wrappers for uploaded videos.
//!
//! Transcoding is delegated entirely to the `ffmpeg` binary; these helpers
//! only build the argument lists and map failures to [`FfmpegError`].

use std::path::Path;

use serde::Deserialize;

use crate::media::{THUMBNAIL_MAX_DIMENSION, VIDEO_MAX_DIMENSION};

/// H.264 constant rate factor (lower = better quality, larger file).
pub const VIDEO_CRF: u8 = 23;

/// x264 encoding speed preset.
pub const VIDEO_PRESET: &str = "medium";

/// Error type for FFmpeg/FFprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("video file not found: {0}")]
    VideoNotFound(String),
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub codec_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration: Option<String>,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run(program: &str, args: Vec<String>) -> Result<Vec<u8>, FfmpegError> {
    let output = tokio::process::Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(output.stdout)
}

fn ensure_exists(path: &Path) -> Result<(), FfmpegError> {
    if path.exists() {
        Ok(())
    } else {
        Err(FfmpegError::VideoNotFound(path.to_string_lossy().to_string()))
    }
}

/// Run `ffprobe` on a video file and return the parsed JSON output.
pub async fn probe_video(path: &Path) -> Result<FfprobeOutput, FfmpegError> {
    ensure_exists(path)?;
    let stdout = run(
        "ffprobe",
        vec![
            "-v".into(),
            "quiet".into(),
            "-print_format".into(),
            "json".into(),
            "-show_format".into(),
            "-show_streams".into(),
            path.to_string_lossy().to_string(),
        ],
    )
    .await?;

    let stdout = String::from_utf8_lossy(&stdout);
    serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| FfmpegError::ParseError(format!("{e}: {stdout}")))
}

/// Scale filter keeping the aspect ratio with the larger side capped at
/// `max`. `-2` keeps the computed side even, as H.264 requires.
pub fn scale_filter(max: u32) -> String {
    format!("scale='if(gte(iw,ih),min({max},iw),-2)':'if(gte(iw,ih),-2,min({max},ih))'")
}

/// Argument list for [`transcode_video`].
pub fn transcode_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        input.to_string_lossy().to_string(),
        "-vf".into(),
        scale_filter(VIDEO_MAX_DIMENSION),
        "-c:v".into(),
        "libx264".into(),
        "-crf".into(),
        VIDEO_CRF.to_string(),
        "-preset".into(),
        VIDEO_PRESET.into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        "128k".into(),
        "-movflags".into(),
        "faststart".into(),
        output.to_string_lossy().to_string(),
    ]
}

/// Transcode a video to H.264/AAC MP4 with its larger side at most 1080px.
pub async fn transcode_video(input: &Path, output: &Path) -> Result<(), FfmpegError> {
    ensure_exists(input)?;
    run("ffmpeg", transcode_args(input, output)).await?;
    Ok(())
}

/// Extract a single frame as a JPEG thumbnail at the given timestamp.
///
/// Videos shorter than `timestamp_secs` fall back to the first frame.
pub async fn extract_frame_thumbnail(
    video_path: &Path,
    output_path: &Path,
    timestamp_secs: f64,
) -> Result<(), FfmpegError> {
    ensure_exists(video_path)?;

    let duration = probe_video(video_path)
        .await
        .map(|p| parse_duration(&p))
        .unwrap_or(0.0);
    let at = if duration > timestamp_secs {
        timestamp_secs
    } else {
        0.0
    };

    run(
        "ffmpeg",
        vec![
            "-y".into(),
            "-ss".into(),
            format!("{at:.3}"),
            "-i".into(),
            video_path.to_string_lossy().to_string(),
            "-vframes".into(),
            "1".into(),
            "-vf".into(),
            scale_filter(THUMBNAIL_MAX_DIMENSION),
            "-q:v".into(),
            "2".into(),
            output_path.to_string_lossy().to_string(),
        ],
    )
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Find the first video stream in the ffprobe output.
fn first_video_stream(probe: &FfprobeOutput) -> Option<&FfprobeStream> {
    probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
}

/// Parse the video duration in seconds from ffprobe output.
pub fn parse_duration(probe: &FfprobeOutput) -> f64 {
    // Try format-level duration first.
    if let Some(secs) = probe.format.duration.as_deref().and_then(|d| d.parse().ok()) {
        return secs;
    }
    first_video_stream(probe)
        .and_then(|s| s.duration.as_deref())
        .and_then(|d| d.parse().ok())
        .unwrap_or(0.0)
}

/// Find the first video stream's resolution.
pub fn parse_resolution(probe: &FfprobeOutput) -> (i32, i32) {
    first_video_stream(probe)
        .map(|s| (s.width.unwrap_or(0), s.height.unwrap_or(0)))
        .unwrap_or((0, 0))
}
