//! Conversion of arbitrary uploads into the canonical recognition format.
//!
//! Canonical means a RIFF WAV with one channel at 16 kHz, 16-bit signed PCM.
//! The heavy lifting is delegated to an `ffmpeg` child process.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;
pub const CANONICAL_CHANNELS: u16 = 1;
pub const CANONICAL_BITS_PER_SAMPLE: u16 = 16;

/// Tail of the transcoder's stderr kept for diagnostics.
const MAX_STDERR_BYTES: usize = 4096;

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("Failed to launch transcoder {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Transcoder failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Normalized audio is not canonical: {0}")]
    InvalidOutput(String),
}

/// Produces a canonical WAV at `destination` from any audio/video `source`.
///
/// Implementations must leave `source` untouched.
#[async_trait]
pub trait AudioNormalizer: Send + Sync {
    async fn normalize(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<(), NormalizationError>;
}

/// Normalizer backed by the `ffmpeg` command-line tool.
#[derive(Debug, Clone)]
pub struct FfmpegNormalizer {
    program: PathBuf,
}

impl FfmpegNormalizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn args(source: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(source.as_os_str().to_os_string());
        args.extend(
            [
                "-vn",
                "-ac",
                "1",
                "-ar",
                "16000",
                "-c:a",
                "pcm_s16le",
                "-f",
                "wav",
            ]
            .iter()
            .map(OsString::from),
        );
        args.push(destination.as_os_str().to_os_string());
        args
    }
}

impl Default for FfmpegNormalizer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioNormalizer for FfmpegNormalizer {
    async fn normalize(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<(), NormalizationError> {
        let started = Instant::now();

        // kill_on_drop: a timed-out pipeline drops this future, which must
        // take the child down with it.
        let output = Command::new(&self.program)
            .args(Self::args(source, destination))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| NormalizationError::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            warn!(
                status = %output.status,
                source = %source.display(),
                "Transcoder exited with failure"
            );
            return Err(NormalizationError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        debug!(
            source = %source.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Audio normalized"
        );
        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(MAX_STDERR_BYTES);
    String::from_utf8_lossy(&stderr[start..]).trim().to_string()
}

/// Header facts about a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Samples per channel
    pub frames: u32,
}

impl WavInfo {
    pub fn is_canonical(&self) -> bool {
        self.channels == CANONICAL_CHANNELS
            && self.sample_rate == CANONICAL_SAMPLE_RATE
            && self.bits_per_sample == CANONICAL_BITS_PER_SAMPLE
    }

    pub fn duration_secs(&self) -> f64 {
        f64::from(self.frames) / f64::from(self.sample_rate.max(1))
    }
}

/// Read the header of a WAV file.
pub fn inspect_wav(path: &Path) -> Result<WavInfo, NormalizationError> {
    let reader = hound::WavReader::open(path).map_err(|e| {
        NormalizationError::InvalidOutput(format!("{}: {e}", path.display()))
    })?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int {
        return Err(NormalizationError::InvalidOutput(
            "expected integer PCM samples".to_string(),
        ));
    }
    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        frames: reader.duration(),
    })
}

/// Check that `path` holds a canonical WAV.
pub fn ensure_canonical(path: &Path) -> Result<WavInfo, NormalizationError> {
    let info = inspect_wav(path)?;
    if !info.is_canonical() {
        return Err(NormalizationError::InvalidOutput(format!(
            "{} channel(s), {} Hz, {}-bit",
            info.channels, info.sample_rate, info.bits_per_sample
        )));
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, seconds: f32) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let frames = (sample_rate as f32 * seconds) as u32;
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 8000.0) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_args_request_canonical_output() {
        let args = FfmpegNormalizer::args(Path::new("/in.m4a"), Path::new("/out.wav"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let joined = args.join(" ");

        assert!(joined.contains("-i /in.m4a"));
        assert!(joined.contains("-ac 1"));
        assert!(joined.contains("-ar 16000"));
        assert!(joined.contains("-c:a pcm_s16le"));
        assert!(joined.contains("-nostdin"));
        assert_eq!(args.last().unwrap(), "/out.wav");
    }

    #[test]
    fn test_stderr_tail_keeps_end() {
        let mut long = vec![b'a'; MAX_STDERR_BYTES];
        long.extend_from_slice(b"Invalid data found when processing input\n");
        let tail = stderr_tail(&long);
        assert!(tail.ends_with("Invalid data found when processing input"));
        assert!(tail.len() <= MAX_STDERR_BYTES);
    }

    #[test]
    fn test_inspect_canonical_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, 16_000, 0.5);

        let info = ensure_canonical(&path).unwrap();
        assert_eq!(info.frames, 8_000);
        assert!((info.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reject_stereo_44k() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 44_100, 0.1);

        let err = ensure_canonical(&path).unwrap_err();
        assert!(err.to_string().contains("2 channel(s), 44100 Hz"));
    }

    #[test]
    fn test_reject_non_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"not a wav file").unwrap();
        assert!(matches!(
            inspect_wav(&path),
            Err(NormalizationError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.wav");
        write_wav(&src, 1, 16_000, 0.1);

        let normalizer = FfmpegNormalizer::new("/nonexistent/bin/ffmpeg");
        let err = normalizer
            .normalize(&src, &dir.path().join("out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, NormalizationError::Launch { .. }));
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg on PATH"]
    async fn test_ffmpeg_downmixes_and_resamples() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("stereo.wav");
        let dst = dir.path().join("canonical.wav");
        write_wav(&src, 2, 44_100, 1.0);
        let before = std::fs::read(&src).unwrap();

        FfmpegNormalizer::default().normalize(&src, &dst).await.unwrap();

        let info = ensure_canonical(&dst).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 16_000);
        assert_eq!(std::fs::read(&src).unwrap(), before);
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg on PATH"]
    async fn test_ffmpeg_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("garbage.m4a");
        std::fs::write(&src, b"definitely not audio").unwrap();

        let err = FfmpegNormalizer::default()
            .normalize(&src, &dir.path().join("out.wav"))
            .await
            .unwrap_err();
        match err {
            NormalizationError::Failed { stderr, .. } => assert!(!stderr.is_empty()),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }
}
